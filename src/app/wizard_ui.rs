use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::{
    domain::{HostParams, WizardDefinition},
    wizard::{HostNotifier, SubmissionGateway, WizardSession},
};

use super::{
    options::UiOptions,
    runtime::{App, SessionOutcome},
    terminal::TerminalGuard,
};

/// Runs one wizard session in the terminal.
pub struct WizardUI {
    definition: WizardDefinition,
    host: HostParams,
    options: UiOptions,
    today: Option<NaiveDate>,
    notifier: Option<Box<dyn HostNotifier>>,
}

impl WizardUI {
    pub fn new(definition: WizardDefinition) -> Self {
        Self {
            definition,
            host: HostParams::default(),
            options: UiOptions::default(),
            today: None,
            notifier: None,
        }
    }

    pub fn with_host(mut self, host: HostParams) -> Self {
        self.host = host;
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_notifier(mut self, notifier: impl HostNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn run<G>(self, gateway: &G) -> Result<SessionOutcome>
    where
        G: SubmissionGateway + ?Sized,
    {
        let WizardUI {
            definition,
            host,
            options,
            today,
            notifier,
        } = self;

        let mut builder = WizardSession::builder(&definition).with_host(host);
        if let Some(today) = today {
            builder = builder.with_today(today);
        }
        if let Some(notifier) = notifier {
            builder = builder.with_boxed_notifier(notifier);
        }
        let session = builder.build().context("failed to start wizard session")?;

        let mut terminal = TerminalGuard::enter()?;
        let outcome = App::new(session, options).run(&mut terminal, gateway)?;
        info!(widget = %definition.id, ?outcome, "terminal session ended");
        Ok(outcome)
    }
}
