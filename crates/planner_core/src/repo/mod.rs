//! Repository layer for persisted planner data.
//!
//! # Responsibility
//! - Define the key-value contract the snapshot adapter writes through.
//! - Keep SQL details out of persistence orchestration.
//!
//! # Invariants
//! - Repositories store opaque text; they never parse snapshot JSON.
//! - Repository construction fails when the schema is not migrated.

pub mod snapshot_repo;
