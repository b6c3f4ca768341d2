//! Task template/instance operations.
//!
//! # Invariants
//! - With a target, `completed == accumulated_count >= target` after every
//!   operation here.
//! - A day holds at most one instance per template.
//! - Deleting a template removes every instance pointing at it.
//! - Template and instances agree on shared fields after `update_task`.

use crate::model::slot::hour_slot;
use crate::model::state::PlannerState;
use crate::model::task::{merge_subtasks, Task};
use crate::ops::{PlannerError, PlannerResult};

/// Outcome of toggling a template on a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceToggle {
    /// A new instance with this id was placed on the day.
    Added(String),
    /// The existing instance with this id was removed.
    Retracted(String),
}

impl PlannerState {
    /// Advances completion of every instance whose `id` or `original_id`
    /// equals `task_id`, across all days.
    ///
    /// Returns how many instances were touched.
    pub fn toggle_task_complete(&mut self, task_id: &str, now_ms: i64) -> PlannerResult<usize> {
        let mut touched = 0;
        for task in self.day_tasks_mut() {
            if task.id == task_id || task.is_instance_of(task_id) {
                advance_completion(task, now_ms);
                touched += 1;
            }
        }
        if touched == 0 {
            return Err(PlannerError::TaskNotFound(task_id.to_string()));
        }
        Ok(touched)
    }

    /// Writes a full task value back into the graph.
    ///
    /// # Contract
    /// - Template id: replace the template, then refresh shared fields on its
    ///   instances without touching their `id`, `time` or `date`.
    /// - Instance id: replace the instance, push editable fields up to its
    ///   template when the back-reference still resolves, then refresh the
    ///   template's other instances from it.
    pub fn update_task(&mut self, mut task: Task) -> PlannerResult<()> {
        task.validate()?;
        task.sync_completion();

        if let Some(template) = self.library.iter_mut().find(|entry| entry.id == task.id) {
            *template = task.clone();
            for instance in self
                .days
                .iter_mut()
                .flat_map(|day| day.tasks.iter_mut())
                .filter(|instance| instance.is_instance_of(&task.id))
            {
                inherit_from_template(instance, &task);
            }
            return Ok(());
        }

        let mut found = false;
        for instance in self.day_tasks_mut().filter(|entry| entry.id == task.id) {
            *instance = task.clone();
            found = true;
        }
        if !found {
            return Err(PlannerError::TaskNotFound(task.id));
        }

        let Some(template_id) = task.original_id.as_deref() else {
            return Ok(());
        };
        let Some(template) = self
            .library
            .iter_mut()
            .find(|entry| entry.id == template_id)
        else {
            return Ok(());
        };
        push_to_template(template, &task);
        let template = template.clone();

        for sibling in self
            .day_tasks_mut()
            .filter(|entry| entry.id != task.id && entry.is_instance_of(&template.id))
        {
            inherit_from_template(sibling, &template);
        }
        Ok(())
    }

    /// Removes a template and every instance whose `id` or `original_id`
    /// matches it. Returns the number of instances removed.
    pub fn delete_library_task(&mut self, task_id: &str) -> PlannerResult<usize> {
        let library_before = self.library.len();
        self.library.retain(|task| task.id != task_id);
        let template_removed = self.library.len() != library_before;

        let mut removed = 0;
        for day in &mut self.days {
            let before = day.tasks.len();
            day.tasks
                .retain(|task| task.id != task_id && !task.is_instance_of(task_id));
            removed += before - day.tasks.len();
        }

        if !template_removed && removed == 0 {
            return Err(PlannerError::TaskNotFound(task_id.to_string()));
        }
        Ok(removed)
    }

    /// Places `template` on `active_date`, or removes it when already there.
    pub fn add_or_retract_instance(
        &mut self,
        template: &Task,
        active_date: u32,
    ) -> PlannerResult<InstanceToggle> {
        let day = self
            .day_mut(active_date)
            .ok_or(PlannerError::DayNotFound(active_date))?;

        if let Some(position) = day
            .tasks
            .iter()
            .position(|task| task.is_instance_of(&template.id))
        {
            let removed = day.tasks.remove(position);
            day.tasks.retain(|task| !task.is_instance_of(&template.id));
            return Ok(InstanceToggle::Retracted(removed.id));
        }

        let mut instance = template.instantiate(active_date);
        instance.sync_completion();
        let instance_id = instance.id.clone();
        day.tasks.push(instance);
        Ok(InstanceToggle::Added(instance_id))
    }

    /// Clears the hour slot of an instance; the instance stays on its day.
    pub fn retract_task(&mut self, task_id: &str) -> PlannerResult<()> {
        self.set_instance_slot(task_id, None)
    }

    /// Puts an instance on the hour grid at `hour`.
    pub fn assign_task_slot(&mut self, task_id: &str, hour: u32) -> PlannerResult<()> {
        let slot = hour_slot(hour).ok_or(PlannerError::InvalidHour(hour))?;
        self.set_instance_slot(task_id, Some(slot))
    }

    /// Flips one subtask and re-derives the task's completion.
    ///
    /// When every subtask ends up done, a targeted task advances its counter
    /// by one (capped at the target); an untargeted task is completed exactly
    /// when all subtasks are done. Returns the subtask's new flag.
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> PlannerResult<bool> {
        let mut task = self
            .instance(task_id)
            .or_else(|| self.library_task(task_id))
            .cloned()
            .ok_or_else(|| PlannerError::TaskNotFound(task_id.to_string()))?;

        let subtask = task
            .subtasks
            .iter_mut()
            .find(|subtask| subtask.id == subtask_id)
            .ok_or_else(|| PlannerError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })?;
        subtask.completed = !subtask.completed;
        let now_completed = subtask.completed;

        let all_done = task.subtasks.iter().all(|subtask| subtask.completed);
        match task.target() {
            Some(target) => {
                if all_done {
                    task.accumulated_count = target.min(task.accumulated_count.saturating_add(1));
                }
                task.sync_completion();
            }
            None => task.completed = all_done,
        }

        self.update_task(task)?;
        Ok(now_completed)
    }

    fn set_instance_slot(&mut self, task_id: &str, slot: Option<String>) -> PlannerResult<()> {
        let mut found = false;
        for task in self.day_tasks_mut().filter(|task| task.id == task_id) {
            task.time = slot.clone();
            found = true;
        }
        if !found {
            return Err(PlannerError::TaskNotFound(task_id.to_string()));
        }
        Ok(())
    }

    fn day_tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.days.iter_mut().flat_map(|day| day.tasks.iter_mut())
    }
}

fn advance_completion(task: &mut Task, now_ms: i64) {
    match task.target() {
        None => {
            task.completed = !task.completed;
            if task.completed {
                task.last_completed_at = Some(now_ms);
            }
        }
        Some(target) => {
            let current = task.accumulated_count;
            let next = if current >= target { 0 } else { current + 1 };
            task.accumulated_count = next;
            task.completed = next >= target;
            if next > current {
                task.last_completed_at = Some(now_ms);
            }
        }
    }
}

fn inherit_from_template(instance: &mut Task, template: &Task) {
    instance.title = template.title.clone();
    instance.category = template.category.clone();
    instance.kr_id = template.kr_id.clone();
    instance.priority = template.priority;
    instance.tracking_mode = template.tracking_mode;
    instance.subtasks = merge_subtasks(&template.subtasks, &instance.subtasks);
    if instance.accumulated_count == 0 {
        instance.target_count = template.target_count;
    }
    instance.sync_completion();
}

fn push_to_template(template: &mut Task, instance: &Task) {
    template.title = instance.title.clone();
    template.category = instance.category.clone();
    template.kr_id = instance.kr_id.clone();
    template.target_count = instance.target_count;
    template.subtasks = instance.subtasks.clone();
    template.priority = instance.priority;
    template.tracking_mode = instance.tracking_mode;
    template.sync_completion();
}
