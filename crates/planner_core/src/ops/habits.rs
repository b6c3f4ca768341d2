//! Habit definition and scheduled-instance operations.
//!
//! # Invariants
//! - A day holds at most one instance per (habit, slot); scheduling the same
//!   pair again removes it.
//! - Deleting a habit removes its instances from every day.
//! - Un-completing an instance never lowers the parent's streak.

use crate::logging::events;
use crate::model::habit::{Habit, HabitInstance};
use crate::model::ids::{new_entity_id, HABIT_INSTANCE_ID_PREFIX};
use crate::model::slot::hour_slot;
use crate::model::state::PlannerState;
use crate::ops::{PlannerError, PlannerResult};
use log::warn;

/// Outcome of toggling a habit on an hour slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitScheduleToggle {
    Scheduled(String),
    Unscheduled(String),
}

impl PlannerState {
    /// Schedules `habit_id` at `hour` on `active_date`, or unschedules it when
    /// that slot already holds the habit.
    pub fn schedule_habit(
        &mut self,
        habit_id: &str,
        hour: u32,
        active_date: u32,
    ) -> PlannerResult<HabitScheduleToggle> {
        let slot = hour_slot(hour).ok_or(PlannerError::InvalidHour(hour))?;
        if self.habit(habit_id).is_none() {
            return Err(PlannerError::HabitNotFound(habit_id.to_string()));
        }
        let day = self
            .day_mut(active_date)
            .ok_or(PlannerError::DayNotFound(active_date))?;

        if let Some(existing) = day.habit_instance_at(habit_id, &slot) {
            let existing_id = existing.id.clone();
            day.scheduled_habits
                .retain(|instance| !(instance.habit_id == habit_id && instance.time == slot));
            return Ok(HabitScheduleToggle::Unscheduled(existing_id));
        }

        let instance = HabitInstance {
            id: new_entity_id(HABIT_INSTANCE_ID_PREFIX),
            habit_id: habit_id.to_string(),
            time: slot,
            completed: false,
        };
        let instance_id = instance.id.clone();
        day.scheduled_habits.push(instance);
        Ok(HabitScheduleToggle::Scheduled(instance_id))
    }

    /// Flips a scheduled instance and updates the parent habit's counters.
    ///
    /// Returns the instance's new `completed` flag. A dangling parent is
    /// logged and skipped; the instance still flips.
    pub fn toggle_habit_instance(
        &mut self,
        instance_id: &str,
        active_date: u32,
        now_ms: i64,
    ) -> PlannerResult<bool> {
        let day = self
            .day_mut(active_date)
            .ok_or(PlannerError::DayNotFound(active_date))?;
        let instance = day
            .scheduled_habits
            .iter_mut()
            .find(|instance| instance.id == instance_id)
            .ok_or_else(|| PlannerError::HabitInstanceNotFound(instance_id.to_string()))?;

        instance.completed = !instance.completed;
        let now_completed = instance.completed;
        let habit_id = instance.habit_id.clone();

        match self.habit_mut(&habit_id) {
            Some(habit) => habit.apply_instance_toggle(now_completed, now_ms),
            None => warn!(
                "event={} module=ops status=dangling instance_id={} habit_id={}",
                events::HABIT_TOGGLE,
                instance_id,
                habit_id
            ),
        }
        Ok(now_completed)
    }

    /// Replaces a habit definition by id.
    pub fn update_habit(&mut self, habit: Habit) -> PlannerResult<()> {
        let slot = self
            .habit_mut(&habit.id)
            .ok_or_else(|| PlannerError::HabitNotFound(habit.id.clone()))?;
        *slot = habit;
        Ok(())
    }

    /// Removes a habit and every scheduled instance of it.
    ///
    /// Returns the number of instances removed.
    pub fn delete_habit(&mut self, habit_id: &str) -> PlannerResult<usize> {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != habit_id);
        if self.habits.len() == before {
            return Err(PlannerError::HabitNotFound(habit_id.to_string()));
        }

        let mut removed = 0;
        for day in &mut self.days {
            let count = day.scheduled_habits.len();
            day.scheduled_habits
                .retain(|instance| instance.habit_id != habit_id);
            removed += count - day.scheduled_habits.len();
        }
        Ok(removed)
    }
}
