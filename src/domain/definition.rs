use std::{collections::HashSet, time::Duration};

use chrono::Weekday;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{error::DefinitionError, locale::LocaleBundle, rules::DependencyRule};

/// Declarative description of one wizard widget: its steps, dependency rules,
/// session settings and the locale bundles it can be rendered in.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WizardDefinition {
    pub id: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    pub steps: Vec<StepDefinition>,
    #[serde(default)]
    pub rules: Vec<DependencyRule>,
    #[serde(default)]
    pub settings: SessionSettings,
    #[serde(default)]
    pub locales: IndexMap<String, LocaleBundle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StepDefinition {
    pub id: String,
    /// Label key of the step heading; falls back to `id`.
    #[serde(default)]
    pub heading: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDefinition {
    pub id: String,
    /// Label key; falls back to `id`.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Initial visibility before any dependency rule has run.
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        #[serde(default)]
        format: TextFormat,
        #[serde(default)]
        multiline: bool,
    },
    Toggle,
    Choice {
        #[serde(default)]
        multiple: bool,
        #[serde(default)]
        max: Option<usize>,
    },
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    #[default]
    Plain,
    Email,
    Phone,
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SessionSettings {
    /// Inactivity lock, in seconds.
    pub timeout_secs: u64,
    pub submit_timeout_secs: u64,
    pub max_slots: usize,
    pub working_days: Vec<DayOfWeek>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15 * 60,
            submit_timeout_secs: 30,
            max_slots: 5,
            working_days: vec![
                DayOfWeek::Mon,
                DayOfWeek::Tue,
                DayOfWeek::Wed,
                DayOfWeek::Thu,
                DayOfWeek::Fri,
            ],
        }
    }
}

impl SessionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Mon => Weekday::Mon,
            DayOfWeek::Tue => Weekday::Tue,
            DayOfWeek::Wed => Weekday::Wed,
            DayOfWeek::Thu => Weekday::Thu,
            DayOfWeek::Fri => Weekday::Fri,
            DayOfWeek::Sat => Weekday::Sat,
            DayOfWeek::Sun => Weekday::Sun,
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

impl WizardDefinition {
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|field| field.id == id)
    }

    /// Resolve the bundle for `locale`: exact tag, then its primary language
    /// (`fr-CA` → `fr`), then the default locale.
    pub fn bundle(&self, locale: Option<&str>) -> Option<(&str, &LocaleBundle)> {
        locale
            .and_then(|tag| {
                self.locales.get_key_value(tag).or_else(|| {
                    let primary = tag.split(['-', '_']).next()?;
                    self.locales
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(primary))
                })
            })
            .or_else(|| self.locales.get_key_value(self.default_locale.as_str()))
            .map(|(tag, bundle)| (tag.as_str(), bundle))
    }

    /// Referential checks the JSON Schema cannot express.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.steps.is_empty() {
            return Err(DefinitionError::NoSteps);
        }
        let Some(default_bundle) = self.locales.get(&self.default_locale) else {
            return Err(DefinitionError::UnknownLocale(self.default_locale.clone()));
        };

        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.fields.is_empty() {
                return Err(DefinitionError::EmptyStep(step.id.clone()));
            }
            for field in &step.fields {
                if !is_identifier(&field.id) {
                    return Err(DefinitionError::InvalidFieldId(field.id.clone()));
                }
                if !seen.insert(field.id.as_str()) {
                    return Err(DefinitionError::DuplicateField(field.id.clone()));
                }
                if let FieldKind::Choice { max, .. } = &field.kind {
                    if *max == Some(0) {
                        return Err(DefinitionError::ZeroCap(field.id.clone()));
                    }
                    match default_bundle.options.get(&field.id) {
                        Some(options) if !options.is_empty() => {}
                        _ => {
                            return Err(DefinitionError::MissingOptions {
                                locale: self.default_locale.clone(),
                                field: field.id.clone(),
                            });
                        }
                    }
                }
            }
        }

        for (index, rule) in self.rules.iter().enumerate() {
            for id in std::iter::once(&rule.trigger).chain(rule.dependents.iter()) {
                if !seen.contains(id.as_str()) {
                    return Err(DefinitionError::UnknownRuleField {
                        rule: index,
                        field: id.clone(),
                    });
                }
            }
        }

        if self.settings.max_slots == 0 {
            return Err(DefinitionError::ZeroCap("settings.max_slots".to_string()));
        }
        Ok(())
    }
}

fn is_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
