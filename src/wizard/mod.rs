//! Wizard controller: navigation, the session lock and submission.

mod actions;
mod gateway;
mod reducers;
mod session;
mod state;
mod timer;

pub use actions::WizardCommand;
pub use gateway::{AcceptAll, GatewayError, HostEvent, HostNotifier, SubmissionGateway};
pub use reducers::{CommandOutcome, apply_command};
pub use session::{NextOutcome, SessionBuilder, SubmissionTicket, SubmitOutcome, WizardSession};
pub use state::{Notice, NoticeKind, Progress, WizardPhase};
pub use timer::SessionTimer;
