//! Service layer orchestration.
//!
//! # Responsibility
//! - Expose use-case entry points for FFI and CLI callers.
//! - Pair every successful state change with a snapshot write.
//!
//! # Invariants
//! - Service APIs never write storage directly; they go through the
//!   snapshot adapter.
//! - A rejected operation is never persisted.

pub mod planner_service;
