//! Task domain model.
//!
//! # Responsibility
//! - Define the record shared by library templates and day-scheduled instances.
//! - Own the completion/progress rules for count-targeted tasks.
//!
//! # Invariants
//! - With an effective `target_count`, `completed == accumulated_count >= target`.
//! - Without a target, `completed` is an independent flag.
//! - An instance id never equals its template id; `original_id` may dangle.

use crate::model::ids::{new_entity_id, INSTANCE_ID_PREFIX};
use crate::model::slot::is_hour_slot;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display kind carried by every task (serialized as `type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Completed,
    Focus,
    Learning,
    #[default]
    Empty,
}

/// Scheduling priority. `Waiting` tasks are kept off the hour grid by views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[default]
    Normal,
    Important,
    Waiting,
}

/// How progress is accumulated: discrete check-ins or timer minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    #[default]
    Count,
    Timer,
}

/// Advisory reset cadence. Not enforced by the state layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetCycle {
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

/// Checklist entry owned by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Library template or day instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    #[serde(default)]
    pub category: String,
    /// Weak back-reference from an instance to its library template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub tracking_mode: TrackingMode,
    /// `Some(0)` is treated the same as `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_count: Option<u32>,
    #[serde(default)]
    pub accumulated_count: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Weak reference to a key result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kr_id: Option<String>,
    /// Hour-grid slot in `HH:00` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Day-of-month this instance belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<u32>,
    /// Unix epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_cycle: Option<ResetCycle>,
}

/// Validation failures for task values supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    InvalidTimeSlot(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeSlot(value) => {
                write!(f, "task time `{value}` is not an `HH:00` hour slot")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates a library template with default priority and tracking mode.
    pub fn template(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        kind: TaskKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            category: category.into(),
            original_id: None,
            priority: TaskPriority::Normal,
            tracking_mode: TrackingMode::Count,
            target_count: None,
            accumulated_count: 0,
            completed: false,
            subtasks: Vec::new(),
            kr_id: None,
            time: None,
            date: None,
            last_completed_at: None,
            remark: None,
            duration: None,
            icon: None,
            reset_cycle: None,
        }
    }

    /// Returns the target count when one is in effect.
    pub fn target(&self) -> Option<u32> {
        self.target_count.filter(|target| *target > 0)
    }

    /// Returns whether the task counts as done for progress purposes.
    pub fn is_done(&self) -> bool {
        self.completed
            || self
                .target()
                .is_some_and(|target| self.accumulated_count >= target)
    }

    /// Re-derives `completed` from the counter when a target is set.
    pub fn sync_completion(&mut self) {
        if let Some(target) = self.target() {
            self.completed = self.accumulated_count >= target;
        }
    }

    /// Builds a fresh day instance from this template.
    ///
    /// # Invariants
    /// - The instance gets a new id and keeps `original_id = self.id`.
    /// - Subtasks are copied with `completed = false`; no slot is assigned.
    pub fn instantiate(&self, date: u32) -> Task {
        let mut instance = self.clone();
        instance.id = new_entity_id(INSTANCE_ID_PREFIX);
        instance.original_id = Some(self.id.clone());
        instance.date = Some(date);
        instance.completed = false;
        instance.time = None;
        for subtask in &mut instance.subtasks {
            subtask.completed = false;
        }
        instance
    }

    /// Returns whether this task was instantiated from `template_id`.
    pub fn is_instance_of(&self, template_id: &str) -> bool {
        self.original_id.as_deref() == Some(template_id)
    }

    /// Checks caller-supplied fields that the state layer relies on.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if let Some(time) = self.time.as_deref() {
            if !is_hour_slot(time) {
                return Err(TaskValidationError::InvalidTimeSlot(time.to_string()));
            }
        }
        Ok(())
    }
}

/// Merges template subtasks into an instance, keeping instance completion
/// flags for subtasks that share an id.
pub fn merge_subtasks(template: &[Subtask], instance: &[Subtask]) -> Vec<Subtask> {
    template
        .iter()
        .map(|subtask| {
            let completed = instance
                .iter()
                .find(|existing| existing.id == subtask.id)
                .is_some_and(|existing| existing.completed);
            Subtask {
                completed,
                ..subtask.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{merge_subtasks, Subtask, Task, TaskKind, TaskValidationError};

    fn subtask(id: &str, completed: bool) -> Subtask {
        Subtask {
            id: id.to_string(),
            title: format!("step {id}"),
            completed,
        }
    }

    #[test]
    fn zero_target_counts_as_no_target() {
        let mut task = Task::template("lib", "Read", "Study", TaskKind::Learning);
        task.target_count = Some(0);
        task.completed = true;
        task.sync_completion();
        assert_eq!(task.target(), None);
        assert!(task.completed);
    }

    #[test]
    fn instantiate_resets_subtasks_and_slot() {
        let mut template = Task::template("lib", "Refactor", "Work", TaskKind::Focus);
        template.subtasks = vec![subtask("a", true)];
        template.time = Some("09:00".to_string());
        template.accumulated_count = 2;

        let instance = template.instantiate(14);
        assert_ne!(instance.id, template.id);
        assert!(instance.is_instance_of("lib"));
        assert_eq!(instance.date, Some(14));
        assert_eq!(instance.time, None);
        assert_eq!(instance.accumulated_count, 2);
        assert!(!instance.subtasks[0].completed);
    }

    #[test]
    fn merge_subtasks_keeps_instance_progress_by_id() {
        let template = vec![subtask("a", false), subtask("b", false)];
        let instance = vec![subtask("a", true), subtask("old", true)];
        let merged = merge_subtasks(&template, &instance);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].completed);
        assert!(!merged[1].completed);
    }

    #[test]
    fn validate_rejects_malformed_slot() {
        let mut task = Task::template("lib", "Mail", "Work", TaskKind::Focus);
        task.time = Some("9:30".to_string());
        assert_eq!(
            task.validate().unwrap_err(),
            TaskValidationError::InvalidTimeSlot("9:30".to_string())
        );
    }
}
