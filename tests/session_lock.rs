use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use stepform::{
    WizardDefinition, WizardSession,
    form::Payload,
    presets,
    wizard::{
        AcceptAll, GatewayError, HostEvent, NextOutcome, SubmissionGateway, SubmitOutcome,
        WizardPhase,
    },
};

/// Answers after `delay`, or never when `delay` is `None`.
struct SlowGateway {
    delay: Option<Duration>,
}

#[async_trait(?Send)]
impl SubmissionGateway for SlowGateway {
    async fn submit(&self, _payload: &Payload) -> Result<(), GatewayError> {
        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending::<()>().await,
        }
        Ok(())
    }
}

fn contact(timeout_secs: u64, submit_timeout_secs: u64) -> WizardDefinition {
    let mut definition = presets::contact();
    definition.settings.timeout_secs = timeout_secs;
    definition.settings.submit_timeout_secs = submit_timeout_secs;
    definition
}

type Events = Rc<RefCell<Vec<&'static str>>>;

fn session_with_events(definition: &WizardDefinition, started: Instant) -> (WizardSession, Events) {
    let events: Events = Rc::default();
    let sink = Rc::clone(&events);
    let session = WizardSession::builder(definition)
        .with_started_at(started)
        .with_notifier(move |event: HostEvent<'_>| {
            sink.borrow_mut().push(match event {
                HostEvent::Completed(_) => "completed",
                HostEvent::Locked => "locked",
            });
        })
        .build()
        .expect("session");
    (session, events)
}

fn fill_to_last_step(session: &mut WizardSession) {
    session.start();
    session.set_text("name", "Ada");
    session.set_text("email", "ada@example.com");
    assert!(matches!(session.next(), NextOutcome::Advanced));
    session.pick_option("topic", "billing");
    session.set_text("message", "Invoice question");
    assert!(matches!(session.next(), NextOutcome::Advanced));
    session.pick_option("contact_method", "phone");
    session.set_toggle("consent", true);
}

#[tokio::test]
async fn timeout_locks_and_later_calls_are_no_ops() {
    let started = Instant::now();
    let (mut session, events) = session_with_events(&contact(900, 30), started);
    session.start();
    session.set_text("name", "Ada");

    assert!(!session.tick(started + Duration::from_secs(899)));
    assert!(session.tick(started + Duration::from_secs(901)));
    assert_eq!(session.phase(), WizardPhase::LockedByTimeout);
    assert!(session.all_fields_disabled());

    assert!(matches!(session.next(), NextOutcome::Ignored));
    assert!(!session.previous());
    assert_eq!(session.submit(&AcceptAll).await, SubmitOutcome::Locked);
    assert!(!session.lock());
    assert_eq!(session.phase(), WizardPhase::LockedByTimeout);
    assert_eq!(events.borrow().as_slice(), ["locked"]);
}

#[tokio::test(start_paused = true)]
async fn lock_firing_during_submission_wins() {
    let (mut session, events) = session_with_events(&contact(2, 30), Instant::now());
    fill_to_last_step(&mut session);

    let outcome = session.submit(&SlowGateway { delay: None }).await;
    assert_eq!(outcome, SubmitOutcome::Locked);
    assert_eq!(session.phase(), WizardPhase::LockedByTimeout);
    assert_eq!(
        session.finish_submit(Ok(())),
        SubmitOutcome::Locked,
        "a late gateway answer is ignored"
    );
    assert_eq!(events.borrow().as_slice(), ["locked"]);
}

#[tokio::test(start_paused = true)]
async fn submission_finishing_first_cancels_the_lock() {
    let started = Instant::now();
    let (mut session, events) = session_with_events(&contact(5, 30), started);
    fill_to_last_step(&mut session);

    let gateway = SlowGateway {
        delay: Some(Duration::from_secs(1)),
    };
    assert_eq!(session.submit(&gateway).await, SubmitOutcome::Submitted);
    assert_eq!(session.lock_remaining(Instant::now()), None);
    assert!(!session.tick(started + Duration::from_secs(3600)));
    assert_eq!(session.phase(), WizardPhase::Submitted);
    assert_eq!(events.borrow().as_slice(), ["completed"]);
}

#[tokio::test(start_paused = true)]
async fn gateway_timeout_is_retriable() {
    let (mut session, events) = session_with_events(&contact(900, 3), Instant::now());
    fill_to_last_step(&mut session);

    let outcome = session.submit(&SlowGateway { delay: None }).await;
    assert!(matches!(&outcome, SubmitOutcome::Failed(message) if message.contains("timed out")));
    assert_eq!(session.phase(), WizardPhase::SubmitFailed);
    assert!(session.accepts_input());
    assert!(events.borrow().is_empty());

    match session.next() {
        NextOutcome::ReadyToSubmit(ticket) => {
            assert_eq!(session.deliver(ticket, &AcceptAll).await, SubmitOutcome::Submitted);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(events.borrow().as_slice(), ["completed"]);
}
