use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maps a trigger field's value onto the visibility and requiredness of
/// the dependent fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DependencyRule {
    pub trigger: String,
    pub when: TriggerPredicate,
    pub dependents: Vec<String>,
    #[serde(default)]
    pub effect: RuleEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerPredicate {
    /// Text equals, toggle matches `"true"`/`"false"`, or the only selected option is `value`.
    Equals { value: String },
    AnyOf { values: Vec<String> },
    /// Multi-select contains the option, or text contains the substring.
    Contains { value: String },
    IsTrue,
    NotEmpty,
}

/// What happens to dependents while the predicate holds. While it does not
/// hold the opposite effect applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleEffect {
    #[default]
    ShowRequire,
    HideOptional,
}

impl DependencyRule {
    pub fn show_when(
        trigger: impl Into<String>,
        when: TriggerPredicate,
        dependents: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            when,
            dependents: dependents.into_iter().map(Into::into).collect(),
            effect: RuleEffect::ShowRequire,
        }
    }

    pub fn hide_when(
        trigger: impl Into<String>,
        when: TriggerPredicate,
        dependents: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            effect: RuleEffect::HideOptional,
            ..Self::show_when(trigger, when, dependents)
        }
    }
}
