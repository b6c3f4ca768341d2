//! Default state for fresh installs and unreadable snapshots.

use crate::derive::calendar::week_days;
use crate::model::goal::{Goal, KeyResult};
use crate::model::habit::Habit;
use crate::model::review::{ReflectionTemplate, ScoreDefinition};
use crate::model::shop::Reward;
use crate::model::state::PlannerState;
use crate::model::task::{ResetCycle, Task, TaskKind, TrackingMode};
use crate::model::theme::default_theme;
use chrono::NaiveDate;

/// Builds the seed graph with the week containing `today`.
pub fn seed_state(today: NaiveDate) -> PlannerState {
    PlannerState {
        days: week_days(today, 0),
        library: seed_library(),
        habits: seed_habits(),
        goals: seed_goals(),
        rewards: seed_rewards(),
        purchase_history: Vec::new(),
        reflection_templates: seed_reflection_templates(),
        score_defs: seed_score_defs(),
        theme: default_theme(),
        is_auto_theme: false,
    }
}

fn seed_library() -> Vec<Task> {
    [
        ("lib1", "Refactor code", "Work", TaskKind::Focus),
        ("lib2", "Write requirements doc", "Work", TaskKind::Focus),
        ("lib3", "Reading", "Study", TaskKind::Learning),
        ("lib4", "Meditation", "Health", TaskKind::Focus),
        ("lib5", "Workout", "Health", TaskKind::Completed),
        ("lib6", "Expense report", "Finance", TaskKind::Completed),
        ("lib7", "Answer email", "Work", TaskKind::Focus),
        ("lib8", "Vocabulary", "Study", TaskKind::Learning),
    ]
    .into_iter()
    .map(|(id, title, category, kind)| Task::template(id, title, category, kind))
    .collect()
}

fn seed_habits() -> Vec<Habit> {
    let mut early_rise = Habit::new("h1", "Early rise (06:00)", "Life", "#f43f5e", "Sun");
    early_rise.streak = 12;
    early_rise.reset_cycle = Some(ResetCycle::Daily);

    let mut reading = Habit::new("h2", "Read 30 min", "Study", "#0ea5e9", "Book");
    reading.streak = 5;
    reading.kr_id = Some("kr1".to_string());
    reading.target_count = Some(30);
    reading.reset_cycle = Some(ResetCycle::Daily);
    reading.tracking_mode = TrackingMode::Timer;

    vec![early_rise, reading]
}

fn seed_goals() -> Vec<Goal> {
    let mut goal = Goal::new("g1", "Master frontend craft", "Study");
    goal.key_results.push(KeyResult {
        id: "kr1".to_string(),
        title: "Ship a real project".to_string(),
        progress: 30,
    });
    vec![goal]
}

fn seed_rewards() -> Vec<Reward> {
    [
        ("r1", "Bubble tea", 10, "Coffee"),
        ("r2", "One hour of games", 15, "Gamepad"),
        ("r3", "Wishlist item", 50, "ShoppingBag"),
    ]
    .into_iter()
    .map(|(id, title, cost, icon)| Reward {
        id: id.to_string(),
        title: title.to_string(),
        cost,
        icon: icon.to_string(),
    })
    .collect()
}

fn seed_reflection_templates() -> Vec<ReflectionTemplate> {
    vec![
        ReflectionTemplate {
            id: "tmp1".to_string(),
            name: "Three good things".to_string(),
            text: "Three good things today:\n1. \n2. \n3. ".to_string(),
        },
        ReflectionTemplate {
            id: "tmp2".to_string(),
            name: "Wins journal".to_string(),
            text: "Today's win:\nKey output:\nTo improve:".to_string(),
        },
    ]
}

fn seed_score_defs() -> Vec<ScoreDefinition> {
    vec![
        ScoreDefinition::with_levels(
            "s1",
            "Focus",
            ["Scattered", "So-so", "Normal", "Focused", "Flow"],
        ),
        ScoreDefinition::with_levels("s2", "Mood", ["Awful", "Low", "Calm", "Happy", "Elated"]),
    ]
}
