pub mod calendar;
mod dependency;
mod field;
mod payload;
mod picker;
mod step;
mod validation;
pub mod validators;

pub use dependency::{DependencyGraph, VisibilityChange};
pub use field::{FieldState, FieldValue};
pub use payload::{META_KEY, Payload, PayloadMeta, PayloadValue};
pub use picker::{OTHER_OPTION_ID, OptionPicker, PickerOption, SelectionMode, ToggleOutcome};
pub use step::StepState;
pub use validation::{
    FieldError, FieldErrorKind, StepReport, check_field, revalidate_field, validate_step,
};
