//! Manual backup export and restore.
//!
//! # Invariants
//! - Export never mutates state.
//! - Restore is all-or-nothing at the parse step: unparseable input leaves
//!   the state untouched.

use crate::logging::{events, redact, MAX_LOGGED_ERROR_CHARS};
use crate::model::state::PlannerState;
use crate::persist::snapshot::{
    encode_snapshot, merge_snapshot, parse_snapshot, MergeMode, SnapshotError,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Destination for exported backup text (clipboard, file, share sheet).
pub trait BackupSink {
    fn deliver(&mut self, text: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Delivered { bytes: usize },
    EncodeFailed(String),
    DeliveryFailed(String),
}

/// Encodes a pretty-printed snapshot and hands it to `sink`.
pub fn export_backup(
    state: &PlannerState,
    now_ms: i64,
    sink: &mut dyn BackupSink,
) -> BackupOutcome {
    let text = match encode_snapshot(state, now_ms, true) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                "event={} module=persist status=error error_code=encode_failed error={}",
                events::BACKUP_EXPORT,
                err
            );
            return BackupOutcome::EncodeFailed(err.to_string());
        }
    };

    match sink.deliver(&text) {
        Ok(()) => {
            info!(
                "event={} module=persist status=ok bytes={}",
                events::BACKUP_EXPORT,
                text.len()
            );
            BackupOutcome::Delivered { bytes: text.len() }
        }
        Err(message) => {
            warn!(
                "event={} module=persist status=error error_code=delivery_failed",
                events::BACKUP_EXPORT
            );
            BackupOutcome::DeliveryFailed(message)
        }
    }
}

#[derive(Debug)]
pub enum RestoreError {
    EmptyInput,
    InvalidJson(serde_json::Error),
    NotAnObject,
}

impl Display for RestoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "restore input is empty"),
            Self::InvalidJson(err) => write!(f, "restore input is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "restore input must be a JSON object"),
        }
    }
}

impl Error for RestoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson(err) => Some(err),
            Self::EmptyInput | Self::NotAnObject => None,
        }
    }
}

impl From<SnapshotError> for RestoreError {
    fn from(value: SnapshotError) -> Self {
        match value {
            SnapshotError::Decode(err) | SnapshotError::Encode(err) => Self::InvalidJson(err),
            SnapshotError::NotAnObject => Self::NotAnObject,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub applied_keys: Vec<String>,
    pub skipped_keys: Vec<String>,
}

/// Merges every top-level key present in `text` into `state`.
///
/// Absent keys keep their current values. Well-formed keys apply even when
/// siblings are malformed; the malformed ones are listed in the report.
pub fn restore_from_text(
    state: &mut PlannerState,
    text: &str,
) -> Result<RestoreReport, RestoreError> {
    if text.trim().is_empty() {
        return Err(RestoreError::EmptyInput);
    }
    let object = parse_snapshot(text).map_err(|err| {
        warn!(
            "event={} module=persist status=error error={}",
            events::SNAPSHOT_RESTORE,
            redact(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
        );
        RestoreError::from(err)
    })?;

    let merged = merge_snapshot(state, object, MergeMode::Restore);
    info!(
        "event={} module=persist status=ok applied={} skipped={}",
        events::SNAPSHOT_RESTORE,
        merged.applied_keys.len(),
        merged.skipped_keys.len()
    );
    Ok(RestoreReport {
        applied_keys: merged.applied_keys,
        skipped_keys: merged.skipped_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::{export_backup, restore_from_text, BackupOutcome, BackupSink, RestoreError};
    use crate::model::state::PlannerState;

    struct FailingSink;

    impl BackupSink for FailingSink {
        fn deliver(&mut self, _text: &str) -> Result<(), String> {
            Err("clipboard unavailable".to_string())
        }
    }

    #[test]
    fn sink_failure_is_reported_separately() {
        let outcome = export_backup(&PlannerState::default(), 0, &mut FailingSink);
        assert_eq!(
            outcome,
            BackupOutcome::DeliveryFailed("clipboard unavailable".to_string())
        );
    }

    #[test]
    fn invalid_input_leaves_state_unchanged() {
        let mut state = PlannerState::default();
        let before = state.clone();

        assert!(matches!(
            restore_from_text(&mut state, "   "),
            Err(RestoreError::EmptyInput)
        ));
        assert!(matches!(
            restore_from_text(&mut state, "{not json"),
            Err(RestoreError::InvalidJson(_))
        ));
        assert!(matches!(
            restore_from_text(&mut state, "\"text\""),
            Err(RestoreError::NotAnObject)
        ));
        assert_eq!(state, before);
    }
}
