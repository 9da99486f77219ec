#![deny(rust_2018_idioms)]

pub mod app;
pub mod domain;
pub mod form;
pub mod io;
pub mod presentation;
pub mod presets;
pub mod telemetry;
pub mod wizard;

pub use app::{SessionOutcome, UiOptions, WizardUI};
pub use domain::{DefinitionError, HostParams, WizardDefinition};
pub use wizard::{SubmissionGateway, WizardSession};

pub mod prelude {
    pub use super::{
        DefinitionError, HostParams, SessionOutcome, SubmissionGateway, UiOptions,
        WizardDefinition, WizardSession, WizardUI,
    };
    pub use crate::form::Payload;
    pub use crate::wizard::{GatewayError, HostEvent, HostNotifier, SubmitOutcome};
}
