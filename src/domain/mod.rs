mod definition;
mod error;
mod host;
mod locale;
mod rules;

pub use definition::{
    DayOfWeek, FieldDefinition, FieldKind, SessionSettings, StepDefinition, TextFormat,
    WizardDefinition,
};
pub use error::DefinitionError;
pub use host::HostParams;
pub use locale::{LocaleBundle, Messages, OptionDefinition};
pub use rules::{DependencyRule, RuleEffect, TriggerPredicate};
