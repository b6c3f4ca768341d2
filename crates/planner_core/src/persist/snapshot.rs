//! Snapshot wire format and per-key merge.
//!
//! # Invariants
//! - Top-level keys are the camelCase `PlannerState` fields plus `version`
//!   and `timestamp`.
//! - `null` is treated the same as an absent key.

use crate::logging::{events, redact, MAX_LOGGED_ERROR_CHARS};
use crate::model::day::DayInfo;
use crate::model::state::PlannerState;
use crate::model::theme::random_theme;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the snapshot row.
pub const SNAPSHOT_KEY: &str = "MINIMALIST_SCHEDULE_DATA";
/// Format version stamped on every written snapshot.
pub const SNAPSHOT_VERSION: &str = "2.8.5";

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    #[serde(flatten)]
    state: &'a PlannerState,
    version: &'static str,
    timestamp: i64,
}

#[derive(Debug)]
pub enum SnapshotError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    /// Valid JSON whose top level is not an object.
    NotAnObject,
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Decode(err) => write!(f, "failed to parse snapshot: {err}"),
            Self::NotAnObject => write!(f, "snapshot top level must be a JSON object"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::NotAnObject => None,
        }
    }
}

/// Serializes `state` with `version` and `timestamp` (epoch ms).
pub fn encode_snapshot(
    state: &PlannerState,
    timestamp: i64,
    pretty: bool,
) -> Result<String, SnapshotError> {
    let document = SnapshotDocument {
        state,
        version: SNAPSHOT_VERSION,
        timestamp,
    };
    let encoded = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    encoded.map_err(SnapshotError::Encode)
}

/// Parses snapshot text into its top-level key map.
pub fn parse_snapshot(text: &str) -> Result<Map<String, Value>, SnapshotError> {
    match serde_json::from_str::<Value>(text).map_err(SnapshotError::Decode)? {
        Value::Object(object) => Ok(object),
        _ => Err(SnapshotError::NotAnObject),
    }
}

/// How a parsed document is folded into existing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Startup load over seed data: empty `days` keeps the seed week and
    /// `isAutoTheme` picks a fresh random theme.
    Load,
    /// User restore: every present key is taken as-is.
    Restore,
}

/// Keys taken from and keys rejected in one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub applied_keys: Vec<String>,
    pub skipped_keys: Vec<String>,
}

impl MergeReport {
    fn field<T: DeserializeOwned>(
        &mut self,
        object: &mut Map<String, Value>,
        key: &'static str,
    ) -> Option<T> {
        let value = object.remove(key).filter(|value| !value.is_null())?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(
                    "event={} module=persist status=skipped key={} error={}",
                    events::SNAPSHOT_MERGE,
                    key,
                    redact(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                self.skipped_keys.push(key.to_string());
                None
            }
        }
    }

    fn applied(&mut self, key: &'static str) {
        self.applied_keys.push(key.to_string());
    }
}

/// Folds every recognized key of `object` into `state`.
///
/// Unknown keys, `version` and `timestamp` are ignored.
pub fn merge_snapshot(
    state: &mut PlannerState,
    mut object: Map<String, Value>,
    mode: MergeMode,
) -> MergeReport {
    let mut report = MergeReport::default();

    if let Some(days) = report.field::<Vec<DayInfo>>(&mut object, "days") {
        if mode == MergeMode::Restore || !days.is_empty() {
            state.days = days;
            report.applied("days");
        }
    }
    if let Some(library) = report.field(&mut object, "library") {
        state.library = library;
        report.applied("library");
    }
    if let Some(habits) = report.field(&mut object, "habits") {
        state.habits = habits;
        report.applied("habits");
    }
    if let Some(goals) = report.field(&mut object, "goals") {
        state.goals = goals;
        report.applied("goals");
    }
    if let Some(rewards) = report.field(&mut object, "rewards") {
        state.rewards = rewards;
        report.applied("rewards");
    }
    if let Some(history) = report.field(&mut object, "purchaseHistory") {
        state.purchase_history = history;
        report.applied("purchaseHistory");
    }
    if let Some(templates) = report.field(&mut object, "reflectionTemplates") {
        state.reflection_templates = templates;
        report.applied("reflectionTemplates");
    }
    if let Some(score_defs) = report.field(&mut object, "scoreDefs") {
        state.score_defs = score_defs;
        report.applied("scoreDefs");
    }
    if let Some(theme) = report.field(&mut object, "theme") {
        state.theme = theme;
        report.applied("theme");
    }
    if let Some(is_auto_theme) = report.field(&mut object, "isAutoTheme") {
        state.is_auto_theme = is_auto_theme;
        report.applied("isAutoTheme");
    }

    if mode == MergeMode::Load && state.is_auto_theme {
        state.theme = random_theme();
    }

    report
}

#[cfg(test)]
mod tests {
    use super::{
        encode_snapshot, merge_snapshot, parse_snapshot, MergeMode, SnapshotError,
        SNAPSHOT_VERSION,
    };
    use crate::model::day::DayInfo;
    use crate::model::state::PlannerState;
    use crate::model::theme::theme_options;
    use serde_json::json;

    #[test]
    fn encoded_snapshot_carries_version_and_timestamp() {
        let text = encode_snapshot(&PlannerState::default(), 42, false).unwrap();
        let object = parse_snapshot(&text).unwrap();
        assert_eq!(object["version"], SNAPSHOT_VERSION);
        assert_eq!(object["timestamp"], 42);
        assert!(object.contains_key("purchaseHistory"));
        assert!(object.contains_key("isAutoTheme"));
    }

    #[test]
    fn parse_rejects_non_object_top_level() {
        assert!(matches!(parse_snapshot("[1,2]"), Err(SnapshotError::NotAnObject)));
        assert!(matches!(parse_snapshot("{"), Err(SnapshotError::Decode(_))));
    }

    #[test]
    fn malformed_key_is_skipped_without_blocking_others() {
        let mut state = PlannerState::default();
        let object = json!({
            "habits": "not a list",
            "rewards": [{"id": "r9", "title": "Nap", "cost": 3, "icon": "Moon"}],
            "goals": null
        });
        let report = merge_snapshot(
            &mut state,
            object.as_object().cloned().unwrap(),
            MergeMode::Restore,
        );

        assert_eq!(report.applied_keys, vec!["rewards".to_string()]);
        assert_eq!(report.skipped_keys, vec!["habits".to_string()]);
        assert_eq!(state.rewards.len(), 1);
        assert!(state.habits.is_empty());
    }

    #[test]
    fn load_keeps_existing_days_when_stored_days_are_empty() {
        let mut state = PlannerState::default();
        state.days.push(DayInfo::empty(14, "WED", "1/14"));
        let object = json!({"days": []}).as_object().cloned().unwrap();

        let report = merge_snapshot(&mut state, object.clone(), MergeMode::Load);
        assert!(report.applied_keys.is_empty());
        assert_eq!(state.days.len(), 1);

        merge_snapshot(&mut state, object, MergeMode::Restore);
        assert!(state.days.is_empty());
    }

    #[test]
    fn load_with_auto_theme_picks_palette_entry() {
        let mut state = PlannerState::default();
        let object = json!({"isAutoTheme": true}).as_object().cloned().unwrap();
        merge_snapshot(&mut state, object, MergeMode::Load);
        assert!(state.is_auto_theme);
        assert!(theme_options().contains(&state.theme));
    }
}
