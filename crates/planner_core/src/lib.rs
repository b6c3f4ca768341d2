//! Local state and persistence core for the planner.
//! This crate owns every business rule for tasks, habits, goals, the reward
//! shop and day reviews; UI shells only call into it.

pub mod db;
pub mod derive;
pub mod logging;
pub mod model;
pub mod ops;
pub mod persist;
pub mod repo;
pub mod seed;
pub mod service;
pub mod timer;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::state::PlannerState;
pub use ops::create::{CreatedItem, NewItemKind};
pub use ops::shop::RedeemOutcome;
pub use ops::{PlannerError, PlannerResult};
pub use persist::adapter::{LoadReport, LoadSource, LoadState, SnapshotAdapter, WriteOutcome};
pub use persist::backup::{BackupOutcome, BackupSink, RestoreError, RestoreReport};
pub use persist::snapshot::{SnapshotError, SNAPSHOT_KEY, SNAPSHOT_VERSION};
pub use repo::snapshot_repo::{RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository};
pub use service::planner_service::PlannerService;
pub use timer::{FocusCredit, FocusSession, FocusTarget, FocusTimer};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
