//! Load-then-observe lifecycle between the state owner and the store.
//!
//! # Responsibility
//! - Produce the startup state from the stored snapshot or the seed.
//! - Write a full snapshot whenever the owner reports a change.
//!
//! # Invariants
//! - Lifecycle only moves `Unloaded -> Loading -> Loaded`.
//! - Writes observed before `Loaded` are suppressed so the seed can never
//!   overwrite stored data.
//! - Store failures are logged, never returned to the caller.

use crate::logging::events;
use crate::persist::snapshot::{
    encode_snapshot, merge_snapshot, parse_snapshot, MergeMode, SNAPSHOT_KEY,
};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::model::state::PlannerState;
use crate::seed::seed_state;
use chrono::NaiveDate;
use log::{error, info, warn};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

/// Where the loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Seed,
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub source: LoadSource,
    pub applied_keys: Vec<String>,
    pub skipped_keys: Vec<String>,
}

impl LoadReport {
    fn seed() -> Self {
        Self {
            source: LoadSource::Seed,
            applied_keys: Vec::new(),
            skipped_keys: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { bytes: usize },
    /// Load has not completed yet.
    Suppressed,
    /// Logged; the in-memory state is still authoritative.
    Failed,
}

/// Snapshot adapter over a key-value repository.
pub struct SnapshotAdapter<R: SnapshotRepository> {
    repo: R,
    load_state: LoadState,
}

impl<R: SnapshotRepository> SnapshotAdapter<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            load_state: LoadState::Unloaded,
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Builds the startup state for the week containing `today`.
    ///
    /// Stored keys are merged over the seed one at a time. A missing,
    /// unreadable or non-object snapshot yields the plain seed. Always ends
    /// in `Loaded`.
    pub fn load(&mut self, today: NaiveDate) -> (PlannerState, LoadReport) {
        let started_at = Instant::now();
        self.load_state = LoadState::Loading;
        let mut state = seed_state(today);

        let report = match self.repo.read_value(SNAPSHOT_KEY) {
            Ok(Some(text)) => match parse_snapshot(&text) {
                Ok(object) => {
                    let merged = merge_snapshot(&mut state, object, MergeMode::Load);
                    LoadReport {
                        source: LoadSource::Snapshot,
                        applied_keys: merged.applied_keys,
                        skipped_keys: merged.skipped_keys,
                    }
                }
                Err(err) => {
                    warn!(
                        "event={} module=persist status=fallback reason=unparseable error={}",
                        events::SNAPSHOT_LOAD,
                        err
                    );
                    LoadReport::seed()
                }
            },
            Ok(None) => LoadReport::seed(),
            Err(err) => {
                error!(
                    "event={} module=persist status=fallback reason=read_failed error={}",
                    events::SNAPSHOT_LOAD,
                    err
                );
                LoadReport::seed()
            }
        };

        self.load_state = LoadState::Loaded;
        info!(
            "event={} module=persist status=ok source={:?} applied={} skipped={} duration_ms={}",
            events::SNAPSHOT_LOAD,
            report.source,
            report.applied_keys.len(),
            report.skipped_keys.len(),
            started_at.elapsed().as_millis()
        );
        (state, report)
    }

    /// Writes `state` as the new snapshot once loading has completed.
    pub fn observe(&self, state: &PlannerState, now_ms: i64) -> WriteOutcome {
        if self.load_state != LoadState::Loaded {
            return WriteOutcome::Suppressed;
        }

        let text = match encode_snapshot(state, now_ms, false) {
            Ok(text) => text,
            Err(err) => {
                error!(
                    "event={} module=persist status=error error_code=encode_failed error={}",
                    events::SNAPSHOT_WRITE,
                    err
                );
                return WriteOutcome::Failed;
            }
        };

        match self.repo.write_value(SNAPSHOT_KEY, &text, now_ms) {
            Ok(()) => {
                info!(
                    "event={} module=persist status=ok bytes={}",
                    events::SNAPSHOT_WRITE,
                    text.len()
                );
                WriteOutcome::Written { bytes: text.len() }
            }
            Err(err) => {
                error!(
                    "event={} module=persist status=error error_code=write_failed error={}",
                    events::SNAPSHOT_WRITE,
                    err
                );
                WriteOutcome::Failed
            }
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
}
