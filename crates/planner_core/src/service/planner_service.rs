//! Planner use-case service.
//!
//! # Responsibility
//! - Own the live `PlannerState`, the focus timer and the active day.
//! - Route every mutation through the state operations and persist on success.
//!
//! # Invariants
//! - State is loaded exactly once, at construction.
//! - Reads never touch storage.

use crate::derive::categories::categories_of;
use crate::logging::events;
use crate::derive::progress::key_result_progress;
use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::review::{ReflectionTemplate, ScoreDefinition};
use crate::model::shop::Reward;
use crate::model::state::PlannerState;
use crate::model::task::Task;
use crate::model::theme::ThemeOption;
use crate::ops::create::{CreatedItem, NewItemKind};
use crate::ops::habits::HabitScheduleToggle;
use crate::ops::shop::RedeemOutcome;
use crate::ops::tasks::InstanceToggle;
use crate::ops::{PlannerError, PlannerResult};
use crate::persist::adapter::{LoadReport, SnapshotAdapter, WriteOutcome};
use crate::persist::backup::{
    export_backup, restore_from_text, BackupOutcome, BackupSink, RestoreError, RestoreReport,
};
use crate::persist::snapshot::{encode_snapshot, SnapshotError};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::timer::{FocusCredit, FocusSession, FocusTarget, FocusTimer};
use chrono::{Datelike, Local, NaiveDate, Utc};
use log::{info, warn};

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Use-case service over one snapshot store.
pub struct PlannerService<R: SnapshotRepository> {
    adapter: SnapshotAdapter<R>,
    state: PlannerState,
    load_report: LoadReport,
    timer: FocusTimer,
    today: NaiveDate,
    active_date: u32,
}

impl<R: SnapshotRepository> PlannerService<R> {
    /// Loads state for the current local date.
    pub fn open(repo: R) -> Self {
        Self::open_at(repo, Local::now().date_naive())
    }

    /// Loads state for the week containing `today`; `today` becomes the
    /// active day.
    pub fn open_at(repo: R, today: NaiveDate) -> Self {
        let mut adapter = SnapshotAdapter::new(repo);
        let (state, load_report) = adapter.load(today);
        Self {
            adapter,
            state,
            load_report,
            timer: FocusTimer::new(),
            today,
            active_date: today.day(),
        }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn active_date(&self) -> u32 {
        self.active_date
    }

    /// Selects the day that add/schedule/create operations target.
    pub fn set_active_date(&mut self, date: u32) -> PlannerResult<()> {
        if self.state.day(date).is_none() {
            return Err(PlannerError::DayNotFound(date));
        }
        self.active_date = date;
        Ok(())
    }

    pub fn balance(&self) -> i64 {
        self.state.balance()
    }

    pub fn categories(&self) -> Vec<String> {
        categories_of(&self.state.library, &self.state.habits, &self.state.goals)
    }

    pub fn key_result_progress(&self, kr_id: &str) -> u32 {
        key_result_progress(kr_id, &self.state.library, &self.state.habits)
    }

    /// Writes the current state to the store.
    pub fn persist(&self) -> WriteOutcome {
        self.adapter.observe(&self.state, now_ms())
    }

    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut PlannerState) -> PlannerResult<T>,
    ) -> PlannerResult<T> {
        let value = op(&mut self.state)?;
        self.persist();
        Ok(value)
    }

    pub fn toggle_task_complete(&mut self, task_id: &str) -> PlannerResult<usize> {
        let now = now_ms();
        self.commit(|state| state.toggle_task_complete(task_id, now))
    }

    pub fn update_task(&mut self, task: Task) -> PlannerResult<()> {
        self.commit(|state| state.update_task(task))
    }

    pub fn delete_library_task(&mut self, task_id: &str) -> PlannerResult<usize> {
        self.commit(|state| state.delete_library_task(task_id))
    }

    /// Adds or retracts the library template `template_id` on the active day.
    pub fn add_or_retract_instance(&mut self, template_id: &str) -> PlannerResult<InstanceToggle> {
        let template = self
            .state
            .library_task(template_id)
            .cloned()
            .ok_or_else(|| PlannerError::TaskNotFound(template_id.to_string()))?;
        let active_date = self.active_date;
        self.commit(|state| state.add_or_retract_instance(&template, active_date))
    }

    pub fn retract_task(&mut self, task_id: &str) -> PlannerResult<()> {
        self.commit(|state| state.retract_task(task_id))
    }

    pub fn assign_task_slot(&mut self, task_id: &str, hour: u32) -> PlannerResult<()> {
        self.commit(|state| state.assign_task_slot(task_id, hour))
    }

    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> PlannerResult<bool> {
        self.commit(|state| state.toggle_subtask(task_id, subtask_id))
    }

    pub fn schedule_habit(&mut self, habit_id: &str, hour: u32) -> PlannerResult<HabitScheduleToggle> {
        let active_date = self.active_date;
        self.commit(|state| state.schedule_habit(habit_id, hour, active_date))
    }

    pub fn toggle_habit_instance(&mut self, instance_id: &str) -> PlannerResult<bool> {
        let active_date = self.active_date;
        let now = now_ms();
        self.commit(|state| state.toggle_habit_instance(instance_id, active_date, now))
    }

    pub fn update_habit(&mut self, habit: Habit) -> PlannerResult<()> {
        self.commit(|state| state.update_habit(habit))
    }

    pub fn delete_habit(&mut self, habit_id: &str) -> PlannerResult<usize> {
        self.commit(|state| state.delete_habit(habit_id))
    }

    pub fn update_goal(&mut self, goal: Goal) -> PlannerResult<()> {
        self.commit(|state| state.update_goal(goal))
    }

    pub fn delete_goal(&mut self, goal_id: &str) -> PlannerResult<()> {
        self.commit(|state| state.delete_goal(goal_id))
    }

    pub fn add_key_result(&mut self, goal_id: &str, title: &str) -> PlannerResult<String> {
        self.commit(|state| state.add_key_result(goal_id, title))
    }

    pub fn remove_key_result(&mut self, goal_id: &str, kr_id: &str) -> PlannerResult<()> {
        self.commit(|state| state.remove_key_result(goal_id, kr_id))
    }

    /// Redeems a catalog reward. Only a successful redemption is persisted.
    pub fn redeem_reward(&mut self, reward_id: &str) -> PlannerResult<RedeemOutcome> {
        let reward = self
            .state
            .reward(reward_id)
            .cloned()
            .ok_or_else(|| PlannerError::RewardNotFound(reward_id.to_string()))?;
        let outcome = self.state.redeem_reward(&reward, now_ms());
        if outcome.is_redeemed() {
            self.persist();
        }
        Ok(outcome)
    }

    pub fn upsert_reward(&mut self, reward: Reward) -> PlannerResult<()> {
        self.commit(|state| state.upsert_reward(reward))
    }

    pub fn delete_reward(&mut self, reward_id: &str) -> PlannerResult<()> {
        self.commit(|state| state.delete_reward(reward_id))
    }

    /// Quick-creates one entity; temp tasks land on the active day.
    pub fn create_item(
        &mut self,
        kind: NewItemKind,
        title: &str,
        category: &str,
    ) -> PlannerResult<CreatedItem> {
        let active_date = self.active_date;
        self.commit(|state| state.create_item(kind, title, category, active_date))
    }

    /// Regenerates the current week and resets the active day to today.
    pub fn clear_schedule(&mut self) {
        self.state.clear_schedule(self.today);
        self.active_date = self.today.day();
        self.persist();
    }

    pub fn set_reflection(&mut self, date: u32, text: &str) -> PlannerResult<()> {
        self.commit(|state| state.set_reflection(date, text))
    }

    pub fn append_reflection_template(&mut self, date: u32, template_id: &str) -> PlannerResult<()> {
        self.commit(|state| state.append_reflection_template(date, template_id))
    }

    pub fn set_day_score(&mut self, date: u32, definition_id: &str, value: i8) -> PlannerResult<()> {
        self.commit(|state| state.set_day_score(date, definition_id, value))
    }

    pub fn upsert_reflection_template(&mut self, template: ReflectionTemplate) -> PlannerResult<()> {
        self.commit(|state| state.upsert_reflection_template(template))
    }

    pub fn delete_reflection_template(&mut self, template_id: &str) -> PlannerResult<()> {
        self.commit(|state| state.delete_reflection_template(template_id))
    }

    pub fn upsert_score_definition(&mut self, definition: ScoreDefinition) -> PlannerResult<()> {
        self.commit(|state| state.upsert_score_definition(definition))
    }

    pub fn delete_score_definition(&mut self, definition_id: &str) -> PlannerResult<()> {
        self.commit(|state| state.delete_score_definition(definition_id))
    }

    pub fn set_theme(&mut self, theme: ThemeOption) {
        self.state.set_theme(theme);
        self.persist();
    }

    pub fn set_auto_theme(&mut self, enabled: bool) {
        self.state.set_auto_theme(enabled);
        self.persist();
    }

    /// Exports a pretty-printed snapshot to `sink`.
    pub fn export_backup(&self, sink: &mut dyn BackupSink) -> BackupOutcome {
        export_backup(&self.state, now_ms(), sink)
    }

    /// Returns the pretty-printed snapshot text.
    pub fn backup_text(&self) -> Result<String, SnapshotError> {
        encode_snapshot(&self.state, now_ms(), true)
    }

    /// Merges a backup into the live state and persists the result.
    pub fn restore(&mut self, text: &str) -> Result<RestoreReport, RestoreError> {
        let report = restore_from_text(&mut self.state, text)?;
        self.persist();
        Ok(report)
    }

    /// Starts a focus session on a task instance of the active day or on a
    /// habit. The session target defaults to the item's target count.
    pub fn start_focus(&mut self, target_id: &str, target: FocusTarget) -> PlannerResult<&FocusSession> {
        let (title, target_minutes) = self.focus_target_details(target_id, target)?;
        Ok(self
            .timer
            .start(target_id, target, title, target_minutes, now_ms()))
    }

    pub fn focus_session(&self) -> Option<&FocusSession> {
        self.timer.session()
    }

    pub fn tick_focus(&mut self, seconds: u64) -> Option<u64> {
        self.timer.tick(seconds)
    }

    pub fn toggle_focus_pause(&mut self) -> Option<bool> {
        self.timer.toggle_pause()
    }

    pub fn cancel_focus(&mut self) -> bool {
        self.timer.cancel()
    }

    /// Ends the session; with `save`, credits whole minutes and persists.
    ///
    /// A saving finish whose target no longer resolves fails and keeps the
    /// session running, so the caller can retarget or cancel it.
    pub fn finish_focus(&mut self, save: bool) -> PlannerResult<Option<FocusCredit>> {
        if save {
            if let Some(session) = self.timer.session() {
                if let Err(err) = self.focus_target_details(&session.target_id, session.target) {
                    warn!(
                        "event={} module=service status=error target_id={} elapsed_seconds={} error={}",
                        events::FOCUS_FINISH,
                        session.target_id,
                        session.elapsed_seconds,
                        err
                    );
                    return Err(err);
                }
            }
        }
        let Some(credit) = self.timer.finish(save) else {
            return Ok(None);
        };
        let active_date = self.active_date;
        self.commit(|state| state.apply_focus_credit(&credit, active_date))?;
        info!(
            "event={} module=service status=ok target_id={} minutes={}",
            events::FOCUS_FINISH,
            credit.target_id,
            credit.minutes
        );
        Ok(Some(credit))
    }

    fn focus_target_details(
        &self,
        target_id: &str,
        target: FocusTarget,
    ) -> PlannerResult<(String, Option<u32>)> {
        match target {
            FocusTarget::Task => self
                .state
                .day(self.active_date)
                .and_then(|day| day.tasks.iter().find(|task| task.id == target_id))
                .map(|task| (task.title.clone(), task.target_count))
                .ok_or_else(|| PlannerError::TaskNotFound(target_id.to_string())),
            FocusTarget::Habit => self
                .state
                .habit(target_id)
                .map(|habit| (habit.title.clone(), habit.target_count))
                .ok_or_else(|| PlannerError::HabitNotFound(target_id.to_string())),
        }
    }

    pub fn repo(&self) -> &R {
        self.adapter.repo()
    }
}
