mod input;
mod options;
mod runtime;
mod status;
mod terminal;
mod wizard_ui;

pub use input::{FocusKind, KeyCommand, classify};
pub use options::UiOptions;
pub use runtime::SessionOutcome;
pub use wizard_ui::WizardUI;
