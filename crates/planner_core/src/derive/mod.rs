//! Read-side derivations over the state graph.
//!
//! # Responsibility
//! - Compute values handed to views: balance, categories, progress, labels,
//!   week windows.
//!
//! # Invariants
//! - Every function here is pure; nothing is cached or stored back.

pub mod balance;
pub mod calendar;
pub mod categories;
pub mod progress;
