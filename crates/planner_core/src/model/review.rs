//! End-of-day review records: score axes, day scores, reflection snippets.
//!
//! # Invariants
//! - Score values and label keys live in `MIN_SCORE..=MAX_SCORE`.
//! - A day holds at most one `DayScore` per `definition_id`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_SCORE: i8 = -2;
pub const MAX_SCORE: i8 = 2;

/// Returns whether `value` is one of the five discrete levels.
pub fn is_valid_score(value: i8) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&value)
}

/// Labeled scoring axis with a display label per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDefinition {
    pub id: String,
    pub label: String,
    /// Serialized as a JSON object keyed `"-2"`..`"2"`.
    #[serde(default)]
    pub labels: BTreeMap<i8, String>,
}

impl ScoreDefinition {
    /// Builds a definition from labels ordered lowest to highest level.
    pub fn with_levels(id: impl Into<String>, label: impl Into<String>, levels: [&str; 5]) -> Self {
        let labels = (MIN_SCORE..=MAX_SCORE)
            .zip(levels)
            .map(|(level, text)| (level, text.to_string()))
            .collect();
        Self {
            id: id.into(),
            label: label.into(),
            labels,
        }
    }

    pub fn level_label(&self, value: i8) -> Option<&str> {
        self.labels.get(&value).map(String::as_str)
    }
}

/// One axis value recorded on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScore {
    pub definition_id: String,
    pub value: i8,
}

/// Reusable reflection snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionTemplate {
    pub id: String,
    pub name: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::{is_valid_score, ScoreDefinition};

    #[test]
    fn labels_serialize_with_signed_string_keys() {
        let def = ScoreDefinition::with_levels("s1", "Focus", ["a", "b", "c", "d", "e"]);
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["labels"]["-2"], "a");
        assert_eq!(json["labels"]["2"], "e");

        let decoded: ScoreDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.level_label(0), Some("c"));
    }

    #[test]
    fn score_range_is_inclusive() {
        assert!(is_valid_score(-2));
        assert!(is_valid_score(2));
        assert!(!is_valid_score(3));
    }
}
