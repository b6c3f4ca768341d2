use chrono::NaiveDate;
use planner_core::model::task::{Subtask, Task, TaskKind};
use planner_core::ops::tasks::InstanceToggle;
use planner_core::seed::seed_state;
use planner_core::{PlannerError, PlannerState};

const DAY: u32 = 14;

fn state_with_template(template: Task) -> PlannerState {
    let mut state = seed_state(NaiveDate::from_ymd_opt(2026, 1, 14).unwrap());
    state.library.push(template);
    state
}

fn added_id(toggle: InstanceToggle) -> String {
    match toggle {
        InstanceToggle::Added(id) => id,
        other => panic!("expected Added, got {other:?}"),
    }
}

#[test]
fn targeted_instance_counts_up_then_wraps() {
    let mut template = Task::template("t1", "Pushups", "Health", TaskKind::Completed);
    template.target_count = Some(3);
    let mut state = state_with_template(template.clone());

    let instance_id = added_id(state.add_or_retract_instance(&template, DAY).unwrap());
    assert_eq!(state.instance(&instance_id).unwrap().accumulated_count, 0);

    let mut observed = Vec::new();
    for step in 0..4 {
        state.toggle_task_complete("t1", step).unwrap();
        let instance = state.instance(&instance_id).unwrap();
        observed.push((instance.accumulated_count, instance.completed));
    }

    assert_eq!(
        observed,
        vec![(1, false), (2, false), (3, true), (0, false)]
    );
}

#[test]
fn completion_tracks_target_under_any_toggle_sequence() {
    let mut template = Task::template("t2", "Water", "Health", TaskKind::Completed);
    template.target_count = Some(2);
    let mut state = state_with_template(template.clone());
    let instance_id = added_id(state.add_or_retract_instance(&template, DAY).unwrap());

    for step in 0..9 {
        state.toggle_task_complete(&instance_id, step).unwrap();
        let instance = state.instance(&instance_id).unwrap();
        assert_eq!(instance.completed, instance.accumulated_count >= 2);
        assert!(instance.accumulated_count <= 2);
    }
}

#[test]
fn add_then_retract_restores_day() {
    let template = Task::template("t3", "Inbox zero", "Work", TaskKind::Focus);
    let mut state = state_with_template(template.clone());
    let before = state.day(DAY).unwrap().tasks.clone();

    let added = added_id(state.add_or_retract_instance(&template, DAY).unwrap());
    let retracted = state.add_or_retract_instance(&template, DAY).unwrap();

    assert_eq!(retracted, InstanceToggle::Retracted(added));
    assert_eq!(state.day(DAY).unwrap().tasks, before);
}

#[test]
fn deleting_template_removes_instances_on_every_day() {
    let template = Task::template("t4", "Stretch", "Health", TaskKind::Completed);
    let mut state = state_with_template(template.clone());
    state.add_or_retract_instance(&template, 12).unwrap();
    state.add_or_retract_instance(&template, 16).unwrap();

    let removed = state.delete_library_task("t4").unwrap();

    assert_eq!(removed, 2);
    assert!(state.library_task("t4").is_none());
    assert!(state
        .days
        .iter()
        .flat_map(|day| &day.tasks)
        .all(|task| !task.is_instance_of("t4")));
}

#[test]
fn template_edit_reaches_instances_and_instance_edit_reaches_template() {
    let template = Task::template("t5", "Draft", "Work", TaskKind::Focus);
    let mut state = state_with_template(template.clone());
    let instance_id = added_id(state.add_or_retract_instance(&template, DAY).unwrap());
    state.assign_task_slot(&instance_id, 9).unwrap();

    let mut edited_template = state.library_task("t5").cloned().unwrap();
    edited_template.title = "Draft v2".to_string();
    edited_template.kr_id = Some("kr1".to_string());
    edited_template.subtasks.push(Subtask {
        id: "s1".to_string(),
        title: "outline".to_string(),
        completed: false,
    });
    state.update_task(edited_template).unwrap();

    let instance = state.instance(&instance_id).cloned().unwrap();
    assert_eq!(instance.title, "Draft v2");
    assert_eq!(instance.kr_id.as_deref(), Some("kr1"));
    assert_eq!(instance.subtasks.len(), 1);
    assert_eq!(instance.time.as_deref(), Some("09:00"));
    assert_eq!(instance.id, instance_id);

    let mut edited_instance = instance;
    edited_instance.category = "Study".to_string();
    edited_instance.target_count = Some(4);
    state.update_task(edited_instance).unwrap();

    let template = state.library_task("t5").unwrap();
    assert_eq!(template.category, "Study");
    assert_eq!(template.target_count, Some(4));
}

#[test]
fn completing_all_subtasks_completes_untargeted_task() {
    let mut template = Task::template("t6", "Release", "Work", TaskKind::Focus);
    template.subtasks = vec![
        Subtask {
            id: "a".to_string(),
            title: "tag".to_string(),
            completed: false,
        },
        Subtask {
            id: "b".to_string(),
            title: "publish".to_string(),
            completed: false,
        },
    ];
    let mut state = state_with_template(template.clone());
    let instance_id = added_id(state.add_or_retract_instance(&template, DAY).unwrap());

    assert!(state.toggle_subtask(&instance_id, "a").unwrap());
    assert!(!state.instance(&instance_id).unwrap().completed);
    state.toggle_subtask(&instance_id, "b").unwrap();
    assert!(state.instance(&instance_id).unwrap().completed);
}

#[test]
fn unknown_ids_are_rejected_without_changes() {
    let mut state = state_with_template(Task::template("t7", "x", "Work", TaskKind::Focus));
    let before = state.clone();

    assert!(matches!(
        state.toggle_task_complete("nope", 0),
        Err(PlannerError::TaskNotFound(_))
    ));
    assert!(matches!(
        state.assign_task_slot("nope", 24),
        Err(PlannerError::InvalidHour(24))
    ));
    let template = state.library_task("t7").cloned().unwrap();
    assert!(matches!(
        state.add_or_retract_instance(&template, 30),
        Err(PlannerError::DayNotFound(30))
    ));
    assert_eq!(state, before);
}

#[test]
fn instance_edit_refreshes_sibling_instances() {
    let template = Task::template("t8", "Draft", "Work", TaskKind::Focus);
    let mut state = state_with_template(template.clone());
    let first = added_id(state.add_or_retract_instance(&template, 12).unwrap());
    let second = added_id(state.add_or_retract_instance(&template, DAY).unwrap());
    state.assign_task_slot(&second, 15).unwrap();

    let mut edited = state.instance(&first).cloned().unwrap();
    edited.title = "Draft v2".to_string();
    edited.category = "Study".to_string();
    state.update_task(edited).unwrap();

    assert_eq!(state.library_task("t8").unwrap().title, "Draft v2");
    let sibling = state.instance(&second).unwrap();
    assert_eq!(sibling.title, "Draft v2");
    assert_eq!(sibling.category, "Study");
    assert_eq!(sibling.time.as_deref(), Some("15:00"));
    assert_eq!(sibling.date, Some(DAY));
}

#[test]
fn retract_clears_slot_but_keeps_instance_on_day() {
    let template = Task::template("t9", "Review PRs", "Work", TaskKind::Focus);
    let mut state = state_with_template(template.clone());
    let instance_id = added_id(state.add_or_retract_instance(&template, DAY).unwrap());
    state.assign_task_slot(&instance_id, 10).unwrap();

    state.retract_task(&instance_id).unwrap();

    let instance = state.instance(&instance_id).unwrap();
    assert_eq!(instance.time, None);
    assert!(state
        .day(DAY)
        .unwrap()
        .tasks
        .iter()
        .any(|task| task.id == instance_id));
    assert!(matches!(
        state.retract_task("nope"),
        Err(PlannerError::TaskNotFound(_))
    ));
}

#[test]
fn template_target_reaches_only_untouched_instances() {
    let mut template = Task::template("t10", "Pushups", "Health", TaskKind::Completed);
    template.target_count = Some(3);
    let mut state = state_with_template(template.clone());
    let started = added_id(state.add_or_retract_instance(&template, 12).unwrap());
    let fresh = added_id(state.add_or_retract_instance(&template, DAY).unwrap());
    state.toggle_task_complete(&started, 0).unwrap();

    let mut edited = state.library_task("t10").cloned().unwrap();
    edited.target_count = Some(5);
    state.update_task(edited).unwrap();

    let started = state.instance(&started).unwrap();
    assert_eq!(started.target_count, Some(3));
    assert_eq!(started.accumulated_count, 1);
    assert_eq!(state.instance(&fresh).unwrap().target_count, Some(5));
}

#[test]
fn subtasks_advance_targeted_counter_up_to_target() {
    let mut template = Task::template("t11", "Sets", "Health", TaskKind::Completed);
    template.target_count = Some(2);
    template.subtasks = vec![Subtask {
        id: "warmup".to_string(),
        title: "warm up".to_string(),
        completed: false,
    }];
    let mut state = state_with_template(template.clone());
    let instance_id = added_id(state.add_or_retract_instance(&template, DAY).unwrap());

    let mut observed = Vec::new();
    for _ in 0..6 {
        state.toggle_subtask(&instance_id, "warmup").unwrap();
        let instance = state.instance(&instance_id).unwrap();
        observed.push((instance.accumulated_count, instance.completed));
    }

    assert_eq!(
        observed,
        vec![
            (1, false),
            (1, false),
            (2, true),
            (2, true),
            (2, true),
            (2, true)
        ]
    );
}
