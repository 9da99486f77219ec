use chrono::NaiveDate;

use crate::domain::{FieldDefinition, FieldKind, LocaleBundle, Messages, SessionSettings, TextFormat};

use super::{
    calendar::{CalendarState, WorkingDays},
    payload::PayloadValue,
    picker::{OptionPicker, PickerOption, SelectionMode},
};

#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Toggle(bool),
    Choice(OptionPicker),
    Slots(CalendarState),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Toggle(value) => !*value,
            FieldValue::Choice(picker) => picker.is_empty(),
            FieldValue::Slots(calendar) => calendar.slots().is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldState {
    pub id: String,
    pub label: String,
    pub format: TextFormat,
    pub multiline: bool,
    pub value: FieldValue,
    /// Requiredness declared by the definition.
    pub base_required: bool,
    /// Current requiredness after dependency rules.
    pub required: bool,
    pub visible: bool,
    pub disabled: bool,
    pub error: Option<String>,
}

impl FieldState {
    pub fn from_definition(
        definition: &FieldDefinition,
        bundle: &LocaleBundle,
        settings: &SessionSettings,
        today: NaiveDate,
    ) -> Self {
        let label_key = definition.label.as_deref().unwrap_or(&definition.id);
        let mut format = TextFormat::Plain;
        let mut multiline = false;
        let mut required = definition.required;
        let value = match &definition.kind {
            FieldKind::Text {
                format: text_format,
                multiline: is_multiline,
            } => {
                format = *text_format;
                multiline = *is_multiline;
                FieldValue::Text(String::new())
            }
            FieldKind::Toggle => FieldValue::Toggle(false),
            FieldKind::Choice { multiple, max } => {
                let options = bundle
                    .options
                    .get(&definition.id)
                    .map(|options| options.iter().map(PickerOption::from).collect())
                    .unwrap_or_default();
                let mode = if *multiple {
                    SelectionMode::Multi
                } else {
                    SelectionMode::Single
                };
                let mut picker = OptionPicker::build(options, mode, *max);
                let placeholder_key = format!("{}.placeholder", definition.id);
                if let Some(placeholder) = bundle.labels.get(&placeholder_key) {
                    picker = picker.with_placeholder(placeholder.clone());
                }
                FieldValue::Choice(picker)
            }
            FieldKind::Calendar => {
                // A calendar step cannot be passed without at least one slot.
                required = true;
                FieldValue::Slots(CalendarState::new(
                    today,
                    WorkingDays::from_days(&settings.working_days),
                    settings.max_slots,
                ))
            }
        };

        Self {
            id: definition.id.clone(),
            label: bundle.label(label_key).to_string(),
            format,
            multiline,
            value,
            base_required: required,
            required: required && !definition.hidden,
            visible: !definition.hidden,
            disabled: false,
            error: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn error_visible(&self) -> bool {
        self.error.is_some()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if let FieldValue::Text(current) = &mut self.value {
            let text = text.into();
            if *current != text {
                *current = text;
                return true;
            }
        }
        false
    }

    pub fn push_char(&mut self, c: char) -> bool {
        if let FieldValue::Text(current) = &mut self.value {
            if c == '\n' && !self.multiline {
                return false;
            }
            current.push(c);
            return true;
        }
        false
    }

    pub fn pop_char(&mut self) -> bool {
        if let FieldValue::Text(current) = &mut self.value
            && current.pop().is_some()
        {
            return true;
        }
        false
    }

    pub fn toggle_value(&self) -> Option<bool> {
        match &self.value {
            FieldValue::Toggle(value) => Some(*value),
            _ => None,
        }
    }

    pub fn set_toggle(&mut self, value: bool) -> bool {
        if let FieldValue::Toggle(current) = &mut self.value
            && *current != value
        {
            *current = value;
            return true;
        }
        false
    }

    pub fn picker(&self) -> Option<&OptionPicker> {
        match &self.value {
            FieldValue::Choice(picker) => Some(picker),
            _ => None,
        }
    }

    pub fn picker_mut(&mut self) -> Option<&mut OptionPicker> {
        match &mut self.value {
            FieldValue::Choice(picker) => Some(picker),
            _ => None,
        }
    }

    pub fn calendar(&self) -> Option<&CalendarState> {
        match &self.value {
            FieldValue::Slots(calendar) => Some(calendar),
            _ => None,
        }
    }

    pub fn calendar_mut(&mut self) -> Option<&mut CalendarState> {
        match &mut self.value {
            FieldValue::Slots(calendar) => Some(calendar),
            _ => None,
        }
    }

    /// Serialized value, or `None` when there is nothing to report.
    pub fn payload_value(&self) -> Option<PayloadValue> {
        match &self.value {
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else if self.format == TextFormat::Phone {
                    Some(PayloadValue::Text(super::validators::normalize_phone(trimmed)))
                } else {
                    Some(PayloadValue::Text(trimmed.to_string()))
                }
            }
            FieldValue::Toggle(value) => Some(PayloadValue::Bool(*value)),
            FieldValue::Choice(picker) => {
                (!picker.is_empty()).then(|| PayloadValue::Options(picker.selected_ids()))
            }
            FieldValue::Slots(calendar) => (!calendar.slots().is_empty())
                .then(|| PayloadValue::Slots(calendar.slots().to_vec())),
        }
    }

    pub fn display_value(&self, messages: &Messages) -> String {
        match &self.value {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Toggle(value) => (if *value { "[x]" } else { "[ ]" }).to_string(),
            FieldValue::Choice(picker) => picker.summary_label(messages),
            FieldValue::Slots(calendar) => {
                if calendar.slots().is_empty() {
                    messages.no_slots.clone()
                } else {
                    calendar
                        .slots()
                        .iter()
                        .map(|slot| slot.display_text(messages))
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OptionDefinition;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).expect("date")
    }

    fn definition(id: &str, kind: FieldKind) -> FieldDefinition {
        FieldDefinition {
            id: id.to_string(),
            label: None,
            kind,
            required: false,
            hidden: false,
        }
    }

    #[test]
    fn builds_picker_from_bundle_options_and_placeholder() {
        let mut bundle = LocaleBundle::default().with_label("types.placeholder", "Choose");
        bundle.options.insert(
            "types".into(),
            vec![OptionDefinition::new("house", "House"), OptionDefinition::new("condo", "Condo")],
        );
        let field = FieldState::from_definition(
            &definition("types", FieldKind::Choice { multiple: true, max: Some(1) }),
            &bundle,
            &SessionSettings::default(),
            today(),
        );
        let picker = field.picker().expect("picker");
        assert!(picker.is_multi());
        assert_eq!(picker.cap(), Some(1));
        assert_eq!(picker.options().len(), 2);
        assert_eq!(field.display_value(&bundle.messages), "Choose");
        assert_eq!(field.label, "types");
    }

    #[test]
    fn calendar_fields_are_always_required() {
        let field = FieldState::from_definition(
            &definition("availability", FieldKind::Calendar),
            &LocaleBundle::default(),
            &SessionSettings::default(),
            today(),
        );
        assert!(field.required);
        assert_eq!(field.calendar().map(CalendarState::max_slots), Some(5));
    }

    #[test]
    fn hidden_fields_start_optional() {
        let mut def = definition("other_text", FieldKind::Text { format: TextFormat::Plain, multiline: false });
        def.required = true;
        def.hidden = true;
        let field = FieldState::from_definition(&def, &LocaleBundle::default(), &SessionSettings::default(), today());
        assert!(!field.visible);
        assert!(!field.required);
        assert!(field.base_required);
    }

    #[test]
    fn phone_payload_is_normalized_and_blank_text_omitted() {
        let mut field = FieldState::from_definition(
            &definition("phone", FieldKind::Text { format: TextFormat::Phone, multiline: false }),
            &LocaleBundle::default(),
            &SessionSettings::default(),
            today(),
        );
        field.set_text("   ");
        assert!(field.payload_value().is_none());
        field.set_text("514-555-1234");
        assert_eq!(
            field.payload_value(),
            Some(PayloadValue::Text("(514) 555-1234".into()))
        );
        assert!(!field.push_char('\n'), "single-line text refuses newlines");
    }
}
