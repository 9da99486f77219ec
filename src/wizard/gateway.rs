use std::time::Duration;

use async_trait::async_trait;

use crate::form::Payload;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to deliver submission: {0}")]
    Delivery(#[from] anyhow::Error),
}

/// Receives the finished payload. Called once per successful final-step
/// validation; the runtime never retries on its own.
#[async_trait(?Send)]
pub trait SubmissionGateway {
    async fn submit(&self, payload: &Payload) -> Result<(), GatewayError>;
}

/// Terminal notifications for the hosting runtime.
#[derive(Debug, Clone, Copy)]
pub enum HostEvent<'a> {
    Completed(&'a Payload),
    /// Forced lock after the session timeout; carries no form data.
    Locked,
}

pub trait HostNotifier {
    fn notify(&mut self, event: HostEvent<'_>);
}

impl<F> HostNotifier for F
where
    F: FnMut(HostEvent<'_>),
{
    fn notify(&mut self, event: HostEvent<'_>) {
        self(event)
    }
}

/// Gateway that accepts everything; handy for demos and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

#[async_trait(?Send)]
impl SubmissionGateway for AcceptAll {
    async fn submit(&self, _payload: &Payload) -> Result<(), GatewayError> {
        Ok(())
    }
}
