//! Quick-create for every entity kind.
//!
//! Each kind has its own constructor; `create_item` only dispatches.

use crate::derive::categories::DEFAULT_CATEGORIES;
use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::ids::{
    new_entity_id, GOAL_ID_PREFIX, HABIT_ID_PREFIX, LIBRARY_ID_PREFIX, REWARD_ID_PREFIX,
    TEMP_TASK_ID_PREFIX,
};
use crate::model::shop::Reward;
use crate::model::state::PlannerState;
use crate::model::task::{Task, TaskKind};
use crate::ops::tasks::InstanceToggle;
use crate::ops::{PlannerError, PlannerResult};

pub const DEFAULT_REWARD_COST: i64 = 10;
const DEFAULT_REWARD_ICON: &str = "Gift";
const DEFAULT_HABIT_ICON: &str = "Star";

/// Entity kinds offered by quick-create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewItemKind {
    /// Library template.
    Task,
    Habit,
    Goal,
    /// One-off task placed straight on the active day, never in the library.
    TempTask,
    Reward,
}

impl NewItemKind {
    /// Parses the snake_case names used across the FFI boundary.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "task" => Some(Self::Task),
            "habit" => Some(Self::Habit),
            "goal" => Some(Self::Goal),
            "temp_task" => Some(Self::TempTask),
            "reward" => Some(Self::Reward),
            _ => None,
        }
    }
}

/// Id of the entity created by `create_item`, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedItem {
    Task(String),
    Habit(String),
    Goal(String),
    /// Id of the day instance.
    TempTask(String),
    Reward(String),
}

impl CreatedItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Task(id)
            | Self::Habit(id)
            | Self::Goal(id)
            | Self::TempTask(id)
            | Self::Reward(id) => id,
        }
    }
}

impl PlannerState {
    /// Creates one entity with type-specific defaults.
    ///
    /// # Errors
    /// - `BlankTitle` when `title` is blank after trim.
    /// - `DayNotFound` for `TempTask` when `active_date` is not in the week.
    pub fn create_item(
        &mut self,
        kind: NewItemKind,
        title: &str,
        category: &str,
        active_date: u32,
    ) -> PlannerResult<CreatedItem> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PlannerError::BlankTitle);
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORIES[0],
            value => value,
        };

        match kind {
            NewItemKind::Task => {
                let task = new_library_task(title, category);
                let id = task.id.clone();
                self.library.push(task);
                Ok(CreatedItem::Task(id))
            }
            NewItemKind::Habit => {
                let habit = new_habit(title, category, &self.theme.color);
                let id = habit.id.clone();
                self.habits.push(habit);
                Ok(CreatedItem::Habit(id))
            }
            NewItemKind::Goal => {
                let goal = new_goal(title, category);
                let id = goal.id.clone();
                self.goals.push(goal);
                Ok(CreatedItem::Goal(id))
            }
            NewItemKind::TempTask => {
                let template = new_temp_task(title, category);
                match self.add_or_retract_instance(&template, active_date)? {
                    InstanceToggle::Added(id) | InstanceToggle::Retracted(id) => {
                        Ok(CreatedItem::TempTask(id))
                    }
                }
            }
            NewItemKind::Reward => {
                let reward = new_reward(title);
                let id = reward.id.clone();
                self.rewards.push(reward);
                Ok(CreatedItem::Reward(id))
            }
        }
    }
}

fn new_library_task(title: &str, category: &str) -> Task {
    Task::template(
        new_entity_id(LIBRARY_ID_PREFIX),
        title,
        category,
        TaskKind::Focus,
    )
}

fn new_temp_task(title: &str, category: &str) -> Task {
    Task::template(
        new_entity_id(TEMP_TASK_ID_PREFIX),
        title,
        category,
        TaskKind::Completed,
    )
}

fn new_habit(title: &str, category: &str, color: &str) -> Habit {
    Habit::new(
        new_entity_id(HABIT_ID_PREFIX),
        title,
        category,
        color,
        DEFAULT_HABIT_ICON,
    )
}

fn new_goal(title: &str, category: &str) -> Goal {
    Goal::new(new_entity_id(GOAL_ID_PREFIX), title, category)
}

fn new_reward(title: &str) -> Reward {
    Reward {
        id: new_entity_id(REWARD_ID_PREFIX),
        title: title.to_string(),
        cost: DEFAULT_REWARD_COST,
        icon: DEFAULT_REWARD_ICON.to_string(),
    }
}
