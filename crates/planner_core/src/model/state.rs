//! Root state graph.
//!
//! # Responsibility
//! - Own every entity collection of the planner in one value.
//! - Provide lookup helpers that resolve weak string references.
//!
//! # Invariants
//! - All entities are reached from this root; nothing is shared across roots.
//! - Lookups return `Option`; a dangling id is never an error.

use crate::derive::progress::resolve_key_result;
use crate::model::day::DayInfo;
use crate::model::goal::{Goal, KeyResult};
use crate::model::habit::Habit;
use crate::model::review::{ReflectionTemplate, ScoreDefinition};
use crate::model::shop::{PurchaseRecord, Reward};
use crate::model::task::Task;
use crate::model::theme::{default_theme, ThemeOption};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerState {
    pub days: Vec<DayInfo>,
    /// Task templates.
    pub library: Vec<Task>,
    pub habits: Vec<Habit>,
    pub goals: Vec<Goal>,
    pub rewards: Vec<Reward>,
    pub purchase_history: Vec<PurchaseRecord>,
    pub reflection_templates: Vec<ReflectionTemplate>,
    pub score_defs: Vec<ScoreDefinition>,
    pub theme: ThemeOption,
    pub is_auto_theme: bool,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            days: Vec::new(),
            library: Vec::new(),
            habits: Vec::new(),
            goals: Vec::new(),
            rewards: Vec::new(),
            purchase_history: Vec::new(),
            reflection_templates: Vec::new(),
            score_defs: Vec::new(),
            theme: default_theme(),
            is_auto_theme: false,
        }
    }
}

impl PlannerState {
    pub fn day(&self, date: u32) -> Option<&DayInfo> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn day_mut(&mut self, date: u32) -> Option<&mut DayInfo> {
        self.days.iter_mut().find(|day| day.date == date)
    }

    pub fn library_task(&self, task_id: &str) -> Option<&Task> {
        self.library.iter().find(|task| task.id == task_id)
    }

    /// Finds a day instance by its own id on any day.
    pub fn instance(&self, task_id: &str) -> Option<&Task> {
        self.days
            .iter()
            .flat_map(|day| day.tasks.iter())
            .find(|task| task.id == task_id)
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == habit_id)
    }

    pub fn habit_mut(&mut self, habit_id: &str) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|habit| habit.id == habit_id)
    }

    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == goal_id)
    }

    /// Resolves a weak `kr_id` to its owning goal and key result.
    pub fn key_result(&self, kr_id: &str) -> Option<(&Goal, &KeyResult)> {
        resolve_key_result(&self.goals, kr_id)
    }

    pub fn reward(&self, reward_id: &str) -> Option<&Reward> {
        self.rewards.iter().find(|reward| reward.id == reward_id)
    }
}
