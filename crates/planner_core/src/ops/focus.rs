//! Applying focus-session minutes to tasks and habits.

use crate::model::state::PlannerState;
use crate::ops::{PlannerError, PlannerResult};
use crate::timer::{FocusCredit, FocusTarget};

impl PlannerState {
    /// Adds credited minutes to the session's target.
    ///
    /// Task credit lands on the instance on `active_date` and is written back
    /// through `update_task`; habit credit lands on the habit definition.
    /// Completion is re-derived only when the target item has a target count.
    pub fn apply_focus_credit(&mut self, credit: &FocusCredit, active_date: u32) -> PlannerResult<()> {
        match credit.target {
            FocusTarget::Task => {
                let day = self
                    .day(active_date)
                    .ok_or(PlannerError::DayNotFound(active_date))?;
                let mut task = day
                    .tasks
                    .iter()
                    .find(|task| task.id == credit.target_id)
                    .cloned()
                    .ok_or_else(|| PlannerError::TaskNotFound(credit.target_id.clone()))?;
                task.accumulated_count = task.accumulated_count.saturating_add(credit.minutes);
                self.update_task(task)
            }
            FocusTarget::Habit => {
                let habit = self
                    .habit_mut(&credit.target_id)
                    .ok_or_else(|| PlannerError::HabitNotFound(credit.target_id.clone()))?;
                habit.accumulated_count = habit.accumulated_count.saturating_add(credit.minutes);
                if let Some(target) = habit.target_count.filter(|target| *target > 0) {
                    habit.completed_today = habit.accumulated_count >= target;
                }
                Ok(())
            }
        }
    }
}
