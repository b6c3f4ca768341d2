//! Week reset.

use crate::derive::calendar::week_days;
use crate::logging::events;
use crate::model::state::PlannerState;
use chrono::NaiveDate;
use log::info;

impl PlannerState {
    /// Regenerates the current week's days from scratch.
    ///
    /// Drops every day-scoped record (instances, scheduled habits,
    /// reflections, scores). Library, habits, goals, rewards, receipts and
    /// settings stay as they are.
    pub fn clear_schedule(&mut self, today: NaiveDate) {
        let dropped_days = self.days.len();
        self.days = week_days(today, 0);
        info!(
            "event={} module=ops status=ok dropped_days={} days={}",
            events::SCHEDULE_CLEAR,
            dropped_days,
            self.days.len()
        );
    }
}
