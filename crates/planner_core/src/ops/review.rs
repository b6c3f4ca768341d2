//! Day review operations plus review/appearance settings.
//!
//! Deleting a score definition keeps the day scores already recorded against
//! it; they still count toward the balance.

use crate::model::review::{is_valid_score, DayScore, ReflectionTemplate, ScoreDefinition};
use crate::model::state::PlannerState;
use crate::model::theme::ThemeOption;
use crate::ops::{PlannerError, PlannerResult};

impl PlannerState {
    /// Replaces a day's reflection text. Empty text clears it.
    pub fn set_reflection(&mut self, date: u32, text: &str) -> PlannerResult<()> {
        let day = self.day_mut(date).ok_or(PlannerError::DayNotFound(date))?;
        day.reflection = (!text.is_empty()).then(|| text.to_string());
        Ok(())
    }

    /// Appends a template's text to a day's reflection on a new line.
    pub fn append_reflection_template(&mut self, date: u32, template_id: &str) -> PlannerResult<()> {
        let text = self
            .reflection_templates
            .iter()
            .find(|template| template.id == template_id)
            .map(|template| template.text.clone())
            .ok_or_else(|| PlannerError::ReflectionTemplateNotFound(template_id.to_string()))?;
        let day = self.day_mut(date).ok_or(PlannerError::DayNotFound(date))?;

        let mut reflection = day.reflection.take().unwrap_or_default();
        if !reflection.is_empty() {
            reflection.push('\n');
        }
        reflection.push_str(&text);
        day.reflection = Some(reflection);
        Ok(())
    }

    /// Records `value` for one score axis on a day, replacing any prior value.
    pub fn set_day_score(&mut self, date: u32, definition_id: &str, value: i8) -> PlannerResult<()> {
        if !is_valid_score(value) {
            return Err(PlannerError::InvalidScore(value));
        }
        if !self.score_defs.iter().any(|def| def.id == definition_id) {
            return Err(PlannerError::ScoreDefinitionNotFound(
                definition_id.to_string(),
            ));
        }
        let day = self.day_mut(date).ok_or(PlannerError::DayNotFound(date))?;
        match day
            .scores
            .iter_mut()
            .find(|score| score.definition_id == definition_id)
        {
            Some(score) => score.value = value,
            None => day.scores.push(DayScore {
                definition_id: definition_id.to_string(),
                value,
            }),
        }
        Ok(())
    }

    pub fn upsert_reflection_template(&mut self, template: ReflectionTemplate) -> PlannerResult<()> {
        if template.name.trim().is_empty() {
            return Err(PlannerError::BlankTitle);
        }
        match self
            .reflection_templates
            .iter_mut()
            .find(|entry| entry.id == template.id)
        {
            Some(slot) => *slot = template,
            None => self.reflection_templates.push(template),
        }
        Ok(())
    }

    pub fn delete_reflection_template(&mut self, template_id: &str) -> PlannerResult<()> {
        let before = self.reflection_templates.len();
        self.reflection_templates
            .retain(|template| template.id != template_id);
        if self.reflection_templates.len() == before {
            return Err(PlannerError::ReflectionTemplateNotFound(
                template_id.to_string(),
            ));
        }
        Ok(())
    }

    /// Inserts or replaces a score axis. Label keys must be valid levels.
    pub fn upsert_score_definition(&mut self, definition: ScoreDefinition) -> PlannerResult<()> {
        if definition.label.trim().is_empty() {
            return Err(PlannerError::BlankTitle);
        }
        if let Some(level) = definition
            .labels
            .keys()
            .copied()
            .find(|level| !is_valid_score(*level))
        {
            return Err(PlannerError::InvalidScore(level));
        }
        match self
            .score_defs
            .iter_mut()
            .find(|entry| entry.id == definition.id)
        {
            Some(slot) => *slot = definition,
            None => self.score_defs.push(definition),
        }
        Ok(())
    }

    pub fn delete_score_definition(&mut self, definition_id: &str) -> PlannerResult<()> {
        let before = self.score_defs.len();
        self.score_defs.retain(|def| def.id != definition_id);
        if self.score_defs.len() == before {
            return Err(PlannerError::ScoreDefinitionNotFound(
                definition_id.to_string(),
            ));
        }
        Ok(())
    }

    pub fn set_theme(&mut self, theme: ThemeOption) {
        self.theme = theme;
    }

    pub fn set_auto_theme(&mut self, enabled: bool) {
        self.is_auto_theme = enabled;
    }
}
