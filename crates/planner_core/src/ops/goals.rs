//! Goal and key-result operations.
//!
//! Removing goals or key results never touches tasks or habits; their `kr_id`
//! simply stops resolving.

use crate::model::goal::{Goal, KeyResult};
use crate::model::ids::{new_entity_id, KEY_RESULT_ID_PREFIX};
use crate::model::state::PlannerState;
use crate::ops::{PlannerError, PlannerResult};

impl PlannerState {
    /// Replaces a goal (including its key-result list) by id.
    pub fn update_goal(&mut self, goal: Goal) -> PlannerResult<()> {
        let slot = self.goal_mut(&goal.id)?;
        *slot = goal;
        Ok(())
    }

    pub fn delete_goal(&mut self, goal_id: &str) -> PlannerResult<()> {
        let before = self.goals.len();
        self.goals.retain(|goal| goal.id != goal_id);
        if self.goals.len() == before {
            return Err(PlannerError::GoalNotFound(goal_id.to_string()));
        }
        Ok(())
    }

    /// Appends a key result to a goal and returns its id.
    pub fn add_key_result(&mut self, goal_id: &str, title: &str) -> PlannerResult<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PlannerError::BlankTitle);
        }
        let goal = self.goal_mut(goal_id)?;
        let key_result = KeyResult {
            id: new_entity_id(KEY_RESULT_ID_PREFIX),
            title: title.to_string(),
            progress: 0,
        };
        let id = key_result.id.clone();
        goal.key_results.push(key_result);
        Ok(id)
    }

    pub fn remove_key_result(&mut self, goal_id: &str, kr_id: &str) -> PlannerResult<()> {
        let goal = self.goal_mut(goal_id)?;
        let before = goal.key_results.len();
        goal.key_results.retain(|kr| kr.id != kr_id);
        if goal.key_results.len() == before {
            return Err(PlannerError::KeyResultNotFound(kr_id.to_string()));
        }
        Ok(())
    }

    fn goal_mut(&mut self, goal_id: &str) -> PlannerResult<&mut Goal> {
        self.goals
            .iter_mut()
            .find(|goal| goal.id == goal_id)
            .ok_or_else(|| PlannerError::GoalNotFound(goal_id.to_string()))
    }
}
