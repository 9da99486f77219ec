use crate::domain::{Messages, TextFormat};

use super::{
    field::{FieldState, FieldValue},
    step::StepState,
    validators::{is_required_present, is_valid_email, is_valid_phone, is_valid_url},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    InvalidFormat,
    SelectionRequired,
    ConsentRequired,
    SlotRequired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field_id: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl StepReport {
    pub fn error_ids(&self) -> Vec<&str> {
        self.errors
            .iter()
            .map(|error| error.field_id.as_str())
            .collect()
    }
}

/// Checks one field without touching it. Hidden fields never fail.
pub fn check_field(field: &FieldState, messages: &Messages) -> Option<FieldError> {
    if !field.visible {
        return None;
    }
    let failure = match &field.value {
        FieldValue::Text(text) => {
            if !is_required_present(text) {
                field.required.then(|| (FieldErrorKind::Required, messages.required.clone()))
            } else {
                format_failure(field.format, text, messages)
                    .map(|message| (FieldErrorKind::InvalidFormat, message))
            }
        }
        FieldValue::Toggle(value) => (field.required && !*value)
            .then(|| (FieldErrorKind::ConsentRequired, messages.consent_required.clone())),
        FieldValue::Choice(picker) => (field.required && picker.is_empty()).then(|| {
            (
                FieldErrorKind::SelectionRequired,
                messages.selection_required.clone(),
            )
        }),
        FieldValue::Slots(calendar) => (field.required && calendar.slots().is_empty())
            .then(|| (FieldErrorKind::SlotRequired, messages.slot_required.clone())),
    };
    failure.map(|(kind, message)| FieldError {
        field_id: field.id.clone(),
        kind,
        message,
    })
}

fn format_failure(format: TextFormat, text: &str, messages: &Messages) -> Option<String> {
    match format {
        TextFormat::Plain => None,
        TextFormat::Email => (!is_valid_email(text)).then(|| messages.invalid_email.clone()),
        TextFormat::Phone => (!is_valid_phone(text)).then(|| messages.invalid_phone.clone()),
        TextFormat::Url => (!is_valid_url(text)).then(|| messages.invalid_url.clone()),
    }
}

/// Validates every field of `step`, updating only error flags. Calling it
/// again with unchanged values yields the same report.
pub fn validate_step(step: &mut StepState, messages: &Messages) -> StepReport {
    let mut errors = Vec::new();
    for field in &mut step.fields {
        match check_field(field, messages) {
            Some(error) => {
                field.set_error(error.message.clone());
                errors.push(error);
            }
            None => field.clear_error(),
        }
    }
    StepReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Re-checks a field after an edit, but only once its error is on screen.
pub fn revalidate_field(field: &mut FieldState, messages: &Messages) {
    if !field.error_visible() {
        return;
    }
    match check_field(field, messages) {
        Some(error) => field.set_error(error.message),
        None => field.clear_error(),
    }
}
