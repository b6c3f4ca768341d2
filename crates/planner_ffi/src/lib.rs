//! Flutter-facing bindings for `planner_core`.

pub mod api;
