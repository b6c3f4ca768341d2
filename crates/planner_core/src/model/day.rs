//! Day aggregate root.
//!
//! `date` is a day-of-month only. Two days from different months with the same
//! number are indistinguishable; the planner only ever holds one week.

use crate::model::habit::HabitInstance;
use crate::model::review::DayScore;
use crate::model::task::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInfo {
    pub date: u32,
    /// `MON`..`SUN`.
    #[serde(default)]
    pub weekday: String,
    /// Display label such as `1/14`.
    #[serde(default)]
    pub full_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub scheduled_habits: Vec<HabitInstance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    #[serde(default)]
    pub scores: Vec<DayScore>,
}

impl DayInfo {
    /// Creates an empty day.
    pub fn empty(date: u32, weekday: impl Into<String>, full_date: impl Into<String>) -> Self {
        Self {
            date,
            weekday: weekday.into(),
            full_date: full_date.into(),
            is_active: None,
            tasks: Vec::new(),
            scheduled_habits: Vec::new(),
            reflection: None,
            scores: Vec::new(),
        }
    }

    /// Sum of every score recorded on this day.
    pub fn score_total(&self) -> i64 {
        self.scores.iter().map(|score| i64::from(score.value)).sum()
    }

    /// Finds a scheduled habit occurrence by (habit, slot).
    pub fn habit_instance_at(&self, habit_id: &str, slot: &str) -> Option<&HabitInstance> {
        self.scheduled_habits
            .iter()
            .find(|instance| instance.habit_id == habit_id && instance.time == slot)
    }
}
