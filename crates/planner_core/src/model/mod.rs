//! Planner domain model.
//!
//! # Responsibility
//! - Define the entity shapes persisted in the planner snapshot.
//! - Keep field names aligned with the camelCase snapshot wire format.
//!
//! # Invariants
//! - Cross-entity links (`original_id`, `kr_id`, `habit_id`) are weak string ids
//!   resolved by lookup; a missing target means "unlinked".
//! - Entities are owned by `PlannerState`; mutation goes through `crate::ops`.

pub mod day;
pub mod goal;
pub mod habit;
pub mod ids;
pub mod review;
pub mod shop;
pub mod slot;
pub mod state;
pub mod task;
pub mod theme;
