//! Snapshot persistence for the planner state.
//!
//! # Responsibility
//! - Encode the whole state graph as one versioned JSON document.
//! - Merge stored or user-supplied documents back key by key.
//! - Gate write-back on the load lifecycle.
//!
//! # Invariants
//! - Reads never fail the caller; unreadable data falls back to seed values.
//! - A malformed key never prevents its well-formed siblings from applying.

pub mod adapter;
pub mod backup;
pub mod snapshot;
