//! Category list shown in pickers and filters.
//!
//! Categories are free-text grouping keys compared by exact string equality;
//! no case or whitespace folding is applied.

use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::task::Task;
use std::collections::BTreeSet;

/// Categories always offered even before anything uses them.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Default", "Work", "Study", "Life", "Health"];

/// Union of non-empty categories across templates, habits and goals plus the
/// defaults, sorted lexicographically.
pub fn categories_of(library: &[Task], habits: &[Habit], goals: &[Goal]) -> Vec<String> {
    let used = library
        .iter()
        .map(|task| task.category.as_str())
        .chain(habits.iter().map(|habit| habit.category.as_str()))
        .chain(goals.iter().map(|goal| goal.category.as_str()))
        .filter(|category| !category.is_empty());

    let mut categories: BTreeSet<&str> = DEFAULT_CATEGORIES.into_iter().collect();
    categories.extend(used);
    categories.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::categories_of;
    use crate::model::goal::Goal;
    use crate::model::task::{Task, TaskKind};

    #[test]
    fn categories_are_deduplicated_sorted_and_exact() {
        let library = vec![
            Task::template("a", "A", "Work", TaskKind::Focus),
            Task::template("b", "B", "work", TaskKind::Focus),
            Task::template("c", "C", "", TaskKind::Focus),
        ];
        let goals = vec![Goal::new("g", "G", "Finance")];

        let categories = categories_of(&library, &[], &goals);
        assert_eq!(
            categories,
            vec!["Default", "Finance", "Health", "Life", "Study", "Work", "work"]
        );
    }
}
