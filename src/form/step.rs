use chrono::NaiveDate;

use crate::domain::{LocaleBundle, SessionSettings, StepDefinition};

use super::field::FieldState;

/// One screen of the wizard.
#[derive(Debug, Clone)]
pub struct StepState {
    pub id: String,
    /// 1-based position in the wizard.
    pub position: usize,
    pub heading: String,
    pub fields: Vec<FieldState>,
}

impl StepState {
    pub fn from_definition(
        definition: &StepDefinition,
        position: usize,
        bundle: &LocaleBundle,
        settings: &SessionSettings,
        today: NaiveDate,
    ) -> Self {
        let heading_key = definition.heading.as_deref().unwrap_or(&definition.id);
        Self {
            id: definition.id.clone(),
            position,
            heading: bundle.label(heading_key).to_string(),
            fields: definition
                .fields
                .iter()
                .map(|field| FieldState::from_definition(field, bundle, settings, today))
                .collect(),
        }
    }

    pub fn field(&self, id: &str) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_mut(&mut self, id: &str) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldState> {
        self.fields.iter().filter(|field| field.visible)
    }

    pub fn error_count(&self) -> usize {
        self.fields.iter().filter(|field| field.error_visible()).count()
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        for field in &mut self.fields {
            field.disabled = disabled;
        }
    }
}
