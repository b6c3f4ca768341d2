//! Habit and scheduled habit instance models.
//!
//! # Invariants
//! - `completed_today` mirrors `accumulated_count >= effective_target()` as of
//!   the last mutation; it is never recomputed lazily.
//! - `accumulated_count` never goes below zero.
//! - `streak` only grows through instance toggles; un-completion never lowers it.

use crate::model::task::{ResetCycle, TrackingMode};
use serde::{Deserialize, Serialize};

const DEFAULT_HABIT_TARGET: u32 = 1;

fn default_frequency() -> u32 {
    1
}

/// Recurring item tracked per period, independent of any day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default)]
    pub completion_times: Vec<String>,
    /// Advisory cadence; not enforced here.
    #[serde(default = "default_frequency")]
    pub frequency_days: u32,
    #[serde(default = "default_frequency")]
    pub frequency_times: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon_name: String,
    #[serde(default)]
    pub completed_today: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kr_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_count: Option<u32>,
    #[serde(default)]
    pub accumulated_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_cycle: Option<ResetCycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<i64>,
    #[serde(default)]
    pub tracking_mode: TrackingMode,
}

impl Habit {
    /// Creates a count-tracked habit with target 1 and no history.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        color: impl Into<String>,
        icon_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            streak: 0,
            remark: None,
            completion_times: Vec::new(),
            frequency_days: 1,
            frequency_times: 1,
            color: color.into(),
            icon_name: icon_name.into(),
            completed_today: false,
            kr_id: None,
            target_count: Some(DEFAULT_HABIT_TARGET),
            accumulated_count: 0,
            reset_cycle: None,
            reset_days: None,
            last_completed_at: None,
            tracking_mode: TrackingMode::Count,
        }
    }

    /// Target used for completion checks; defaults to 1.
    pub fn effective_target(&self) -> u32 {
        self.target_count
            .filter(|target| *target > 0)
            .unwrap_or(DEFAULT_HABIT_TARGET)
    }

    /// Applies one scheduled-instance completion flip to the counters.
    ///
    /// Streak grows only when this flip is the one that first reaches the
    /// target while the habit was not already `completed_today`.
    pub fn apply_instance_toggle(&mut self, now_completed: bool, now_ms: i64) {
        let target = self.effective_target();
        let next = if now_completed {
            self.accumulated_count.saturating_add(1)
        } else {
            self.accumulated_count.saturating_sub(1)
        };
        let reached = next >= target;
        if now_completed && reached && !self.completed_today {
            self.streak = self.streak.saturating_add(1);
        }
        self.accumulated_count = next;
        self.completed_today = reached;
        if now_completed {
            self.last_completed_at = Some(now_ms);
        }
    }
}

/// One scheduled occurrence of a habit on a day's hour grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitInstance {
    pub id: String,
    /// Required weak reference to the parent habit.
    pub habit_id: String,
    /// `HH:00` slot.
    pub time: String,
    #[serde(default)]
    pub completed: bool,
}
