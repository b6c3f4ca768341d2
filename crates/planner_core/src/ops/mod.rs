//! State transitions on `PlannerState`.
//!
//! # Responsibility
//! - Implement every named mutation as a method on the state owner.
//! - Report caller mistakes (unknown ids, out-of-range values) as
//!   `PlannerError` without touching state.
//!
//! # Invariants
//! - Operations run to completion synchronously; a failed precondition
//!   leaves the graph unchanged.
//! - Operations never persist; the service layer writes snapshots.

use crate::model::task::TaskValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod create;
pub mod focus;
pub mod goals;
pub mod habits;
pub mod review;
pub mod schedule;
pub mod shop;
pub mod tasks;

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Precondition failures for state operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    TaskNotFound(String),
    SubtaskNotFound { task_id: String, subtask_id: String },
    HabitNotFound(String),
    HabitInstanceNotFound(String),
    GoalNotFound(String),
    KeyResultNotFound(String),
    RewardNotFound(String),
    ScoreDefinitionNotFound(String),
    ReflectionTemplateNotFound(String),
    DayNotFound(u32),
    InvalidHour(u32),
    InvalidScore(i8),
    InvalidCost(i64),
    BlankTitle,
    InvalidTask(TaskValidationError),
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::SubtaskNotFound {
                task_id,
                subtask_id,
            } => write!(f, "subtask {subtask_id} not found on task {task_id}"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::HabitInstanceNotFound(id) => write!(f, "habit instance not found: {id}"),
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::KeyResultNotFound(id) => write!(f, "key result not found: {id}"),
            Self::RewardNotFound(id) => write!(f, "reward not found: {id}"),
            Self::ScoreDefinitionNotFound(id) => write!(f, "score definition not found: {id}"),
            Self::ReflectionTemplateNotFound(id) => {
                write!(f, "reflection template not found: {id}")
            }
            Self::DayNotFound(date) => write!(f, "day not found: {date}"),
            Self::InvalidHour(hour) => write!(f, "hour must be within 0..=23, got {hour}"),
            Self::InvalidScore(value) => write!(f, "score must be within -2..=2, got {value}"),
            Self::InvalidCost(cost) => write!(f, "reward cost must not be negative, got {cost}"),
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::InvalidTask(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTask(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for PlannerError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}
