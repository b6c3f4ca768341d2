//! Progress values for key results, tasks, habits and day scores.

use crate::model::day::DayInfo;
use crate::model::goal::{Goal, KeyResult};
use crate::model::habit::Habit;
use crate::model::task::Task;

/// Percentage of linked library tasks and habits that are done.
///
/// A task is done when `completed` or its counter reached the target; a habit
/// is done when `completed_today`. Returns 0 when nothing links to `kr_id`.
pub fn key_result_progress(kr_id: &str, library: &[Task], habits: &[Habit]) -> u32 {
    let linked_tasks = library
        .iter()
        .filter(|task| task.kr_id.as_deref() == Some(kr_id));
    let linked_habits = habits
        .iter()
        .filter(|habit| habit.kr_id.as_deref() == Some(kr_id));

    let (mut total, mut done) = (0_u32, 0_u32);
    for task in linked_tasks {
        total += 1;
        done += u32::from(task.is_done());
    }
    for habit in linked_habits {
        total += 1;
        done += u32::from(habit.completed_today);
    }

    if total == 0 {
        return 0;
    }
    (f64::from(done) * 100.0 / f64::from(total)).round() as u32
}

/// Progress bar fill for a task, clamped to 0..=100.
pub fn task_progress_percent(task: &Task) -> u32 {
    match task.target() {
        Some(target) => ratio_percent(task.accumulated_count, target),
        None if task.completed => 100,
        None => 0,
    }
}

/// Progress bar fill for a habit, clamped to 0..=100.
pub fn habit_progress_percent(habit: &Habit) -> u32 {
    match habit.target_count.filter(|target| *target > 0) {
        Some(target) => ratio_percent(habit.accumulated_count, target),
        None => 0,
    }
}

/// Score recorded on `day` for one axis, 0 when unset.
pub fn day_score_value(day: Option<&DayInfo>, definition_id: &str) -> i8 {
    day.and_then(|day| {
        day.scores
            .iter()
            .find(|score| score.definition_id == definition_id)
    })
    .map_or(0, |score| score.value)
}

/// Finds the goal owning `kr_id` together with the key result itself.
pub fn resolve_key_result<'a>(goals: &'a [Goal], kr_id: &str) -> Option<(&'a Goal, &'a KeyResult)> {
    goals
        .iter()
        .find_map(|goal| goal.key_result(kr_id).map(|kr| (goal, kr)))
}

fn ratio_percent(count: u32, target: u32) -> u32 {
    let percent = u64::from(count) * 100 / u64::from(target);
    percent.min(100) as u32
}

#[cfg(test)]
mod tests {
    use super::{key_result_progress, task_progress_percent};
    use crate::model::habit::Habit;
    use crate::model::task::{Task, TaskKind};

    fn linked_task(id: &str, kr: &str) -> Task {
        let mut task = Task::template(id, id, "Work", TaskKind::Focus);
        task.kr_id = Some(kr.to_string());
        task
    }

    #[test]
    fn progress_counts_tasks_and_habits() {
        let mut counted = linked_task("a", "kr1");
        counted.target_count = Some(2);
        counted.accumulated_count = 2;
        let open = linked_task("b", "kr1");
        let other = linked_task("c", "kr2");
        let mut habit = Habit::new("h", "Run", "Health", "#000", "Star");
        habit.kr_id = Some("kr1".to_string());

        let library = vec![counted, open, other];
        assert_eq!(key_result_progress("kr1", &library, &[habit.clone()]), 33);

        habit.completed_today = true;
        assert_eq!(key_result_progress("kr1", &library, &[habit]), 67);
    }

    #[test]
    fn progress_without_links_is_zero() {
        assert_eq!(key_result_progress("missing", &[], &[]), 0);
    }

    #[test]
    fn task_progress_is_clamped() {
        let mut task = Task::template("a", "A", "Work", TaskKind::Focus);
        task.target_count = Some(30);
        task.accumulated_count = 45;
        assert_eq!(task_progress_percent(&task), 100);
    }
}
