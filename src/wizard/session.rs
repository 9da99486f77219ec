use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::{
    domain::{DefinitionError, HostParams, LocaleBundle, Messages, SessionSettings, WizardDefinition},
    form::{
        DependencyGraph, FieldState, Payload, PayloadMeta, StepReport, StepState, ToggleOutcome,
        calendar::{ConfirmOutcome, TimeOfDay},
        revalidate_field, validate_step,
    },
};

use super::{
    gateway::{GatewayError, HostEvent, HostNotifier, SubmissionGateway},
    state::{Notice, NoticeKind, Progress, WizardPhase},
    timer::SessionTimer,
};

/// Snapshot handed out when a session enters `Submitting`.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    pub payload: Payload,
}

#[derive(Debug, Clone)]
pub enum NextOutcome {
    Advanced,
    Blocked(StepReport),
    /// The final step passed; deliver the ticket to a gateway.
    ReadyToSubmit(SubmissionTicket),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Failed(String),
    Locked,
    /// Nothing was sent: wrong phase or the final step is invalid.
    Refused,
}

pub struct SessionBuilder<'a> {
    definition: &'a WizardDefinition,
    host: HostParams,
    today: Option<NaiveDate>,
    started_at: Option<Instant>,
    notifier: Option<Box<dyn HostNotifier>>,
}

impl<'a> SessionBuilder<'a> {
    pub fn with_host(mut self, host: HostParams) -> Self {
        self.host = host;
        self
    }

    /// Pins "today" for the calendar; defaults to the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_started_at(mut self, started_at: Instant) -> Self {
        self.started_at = Some(started_at);
        self
    }

    pub fn with_notifier(self, notifier: impl HostNotifier + 'static) -> Self {
        self.with_boxed_notifier(Box::new(notifier))
    }

    pub fn with_boxed_notifier(mut self, notifier: Box<dyn HostNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> Result<WizardSession, DefinitionError> {
        let SessionBuilder {
            definition,
            host,
            today,
            started_at,
            notifier,
        } = self;

        definition.validate()?;
        let (locale, bundle) = resolve_bundle(definition, host.locale.as_deref())?;
        let settings = definition.settings.clone();
        let today = today.unwrap_or_else(|| Local::now().date_naive());

        let mut steps: Vec<StepState> = definition
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepState::from_definition(step, index + 1, &bundle, &settings, today))
            .collect();
        let graph = DependencyGraph::new(definition.rules.clone());
        let adjusted = graph.evaluate_all(&mut steps);

        let meta = PayloadMeta {
            widget: definition.id.clone(),
            locale: locale.clone(),
            endpoint: host.endpoint.clone(),
            base_cost: host.base_cost,
            context: host.context.clone(),
        };
        let payload = Payload::new(meta, steps.len());
        let timer = SessionTimer::start(started_at.unwrap_or_else(Instant::now), settings.timeout());

        debug!(
            widget = %definition.id,
            %locale,
            steps = steps.len(),
            adjusted = adjusted.len(),
            "session created"
        );
        Ok(WizardSession {
            widget_id: definition.id.clone(),
            locale,
            bundle,
            settings,
            steps,
            graph,
            phase: WizardPhase::Welcome,
            cursor: 0,
            payload,
            timer,
            today,
            notice: None,
            open_picker: None,
            last_error: None,
            notifier,
            notified: false,
        })
    }
}

/// Picks the requested bundle and backfills missing labels and option lists
/// from the default locale.
fn resolve_bundle(
    definition: &WizardDefinition,
    locale: Option<&str>,
) -> Result<(String, LocaleBundle), DefinitionError> {
    let (tag, bundle) = definition
        .bundle(locale)
        .ok_or_else(|| DefinitionError::UnknownLocale(definition.default_locale.clone()))?;
    let mut resolved = bundle.clone();
    if let Some(fallback) = definition.locales.get(&definition.default_locale) {
        for (key, label) in &fallback.labels {
            resolved.labels.entry(key.clone()).or_insert_with(|| label.clone());
        }
        for (field, options) in &fallback.options {
            resolved.options.entry(field.clone()).or_insert_with(|| options.clone());
        }
    }
    Ok((tag.to_string(), resolved))
}

/// Aggregate root of one widget render: steps, navigation, payload and the
/// terminal state. Every mutation goes through its methods.
pub struct WizardSession {
    widget_id: String,
    locale: String,
    bundle: LocaleBundle,
    settings: SessionSettings,
    steps: Vec<StepState>,
    graph: DependencyGraph,
    phase: WizardPhase,
    /// Last step index the user was on; kept for display after locking.
    cursor: usize,
    payload: Payload,
    timer: SessionTimer,
    today: NaiveDate,
    notice: Option<Notice>,
    open_picker: Option<String>,
    last_error: Option<String>,
    notifier: Option<Box<dyn HostNotifier>>,
    notified: bool,
}

impl std::fmt::Debug for WizardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardSession")
            .field("widget_id", &self.widget_id)
            .field("locale", &self.locale)
            .field("phase", &self.phase)
            .field("steps", &self.steps.len())
            .finish_non_exhaustive()
    }
}

impl WizardSession {
    pub fn builder(definition: &WizardDefinition) -> SessionBuilder<'_> {
        SessionBuilder {
            definition,
            host: HostParams::default(),
            today: None,
            started_at: None,
            notifier: None,
        }
    }

    pub fn new(definition: &WizardDefinition, host: HostParams) -> Result<Self, DefinitionError> {
        Self::builder(definition).with_host(host).build()
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn bundle(&self) -> &LocaleBundle {
        &self.bundle
    }

    pub fn messages(&self) -> &Messages {
        &self.bundle.messages
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn steps(&self) -> &[StepState] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn lock_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Index of the step currently on screen.
    pub fn active_index(&self) -> Option<usize> {
        match self.phase {
            WizardPhase::Step(index) => Some(index),
            WizardPhase::Submitting | WizardPhase::SubmitFailed => Some(self.last_index()),
            _ => None,
        }
    }

    pub fn active_step(&self) -> Option<&StepState> {
        self.active_index().and_then(|index| self.steps.get(index))
    }

    pub fn field(&self, id: &str) -> Option<&FieldState> {
        self.steps.iter().find_map(|step| step.field(id))
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self.phase, WizardPhase::Step(_) | WizardPhase::SubmitFailed)
    }

    pub fn all_fields_disabled(&self) -> bool {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .all(|field| field.disabled)
    }

    /// Percentage is `active / (N - 1)`; derived, never stored.
    pub fn progress(&self) -> Progress {
        let total = self.steps.len();
        let index = match self.phase {
            WizardPhase::Welcome => {
                return Progress {
                    current: 0,
                    total,
                    percent: 0,
                };
            }
            WizardPhase::Submitted => self.last_index(),
            WizardPhase::LockedByTimeout => self.cursor,
            _ => self.active_index().unwrap_or(0),
        };
        let percent = if total > 1 {
            (index * 100 / (total - 1)) as u16
        } else if self.phase == WizardPhase::Submitted {
            100
        } else {
            0
        };
        Progress {
            current: index + 1,
            total,
            percent,
        }
    }

    pub fn start(&mut self) -> bool {
        if self.phase != WizardPhase::Welcome {
            return false;
        }
        self.enter_step(0);
        true
    }

    pub fn next(&mut self) -> NextOutcome {
        let index = match self.phase {
            WizardPhase::Welcome => {
                self.start();
                return NextOutcome::Advanced;
            }
            WizardPhase::Step(index) => index,
            WizardPhase::SubmitFailed => self.last_index(),
            _ => return NextOutcome::Ignored,
        };
        self.close_picker();

        let report = validate_step(&mut self.steps[index], &self.bundle.messages);
        if !report.valid {
            debug!(step = index + 1, errors = ?report.error_ids(), "step blocked");
            return NextOutcome::Blocked(report);
        }
        self.payload.record_step(index, &self.steps[index]);

        if index + 1 < self.steps.len() {
            self.enter_step(index + 1);
            return NextOutcome::Advanced;
        }
        match self.prepare_submit() {
            Some(Ok(ticket)) => NextOutcome::ReadyToSubmit(ticket),
            Some(Err(report)) => NextOutcome::Blocked(report),
            None => NextOutcome::Ignored,
        }
    }

    /// Steps back without validating. Errors on the step being left stay.
    pub fn previous(&mut self) -> bool {
        let index = match self.phase {
            WizardPhase::Step(index) => index,
            WizardPhase::SubmitFailed => {
                self.last_error = None;
                self.last_index()
            }
            _ => return false,
        };
        self.close_picker();
        if index == 0 {
            self.phase = WizardPhase::Welcome;
        } else {
            self.enter_step(index - 1);
        }
        debug!(phase = self.phase.name(), "moved back");
        true
    }

    /// Enters `Submitting` synchronously so no second submission can start
    /// while one is outstanding.
    pub fn begin_submit(&mut self) -> Option<SubmissionTicket> {
        self.prepare_submit().and_then(Result::ok)
    }

    /// `None` outside the final step. Every step is validated and recorded
    /// again, since a later answer can reveal or hide fields on an earlier
    /// step; the first failing step becomes active.
    fn prepare_submit(&mut self) -> Option<Result<SubmissionTicket, StepReport>> {
        let last = self.last_index();
        match self.phase {
            WizardPhase::Step(index) if index == last => {}
            WizardPhase::SubmitFailed => {}
            _ => return None,
        }
        self.phase = WizardPhase::Submitting;
        self.close_picker();

        let messages = &self.bundle.messages;
        let mut blocked = None;
        for (index, step) in self.steps.iter_mut().enumerate() {
            let report = validate_step(step, messages);
            if report.valid {
                self.payload.record_step(index, step);
            } else if blocked.is_none() {
                blocked = Some((index, report));
            }
        }
        if let Some((index, report)) = blocked {
            debug!(step = index + 1, errors = ?report.error_ids(), "submission blocked");
            self.enter_step(index);
            return Some(Err(report));
        }
        self.last_error = None;
        self.set_all_disabled(true);
        info!(widget = %self.widget_id, fields = self.payload.len(), "submission started");
        Some(Ok(SubmissionTicket {
            payload: self.payload.clone(),
        }))
    }

    /// Applies the gateway result. Ignored unless the session is still
    /// `Submitting`; a lock that landed first wins.
    pub fn finish_submit(&mut self, result: Result<(), GatewayError>) -> SubmitOutcome {
        match self.phase {
            WizardPhase::Submitting => {}
            WizardPhase::LockedByTimeout => return SubmitOutcome::Locked,
            _ => return SubmitOutcome::Refused,
        }
        match result {
            Ok(()) => {
                self.phase = WizardPhase::Submitted;
                self.timer.cancel();
                info!(widget = %self.widget_id, "submission accepted");
                if !self.notified {
                    self.notified = true;
                    if let Some(notifier) = self.notifier.as_mut() {
                        notifier.notify(HostEvent::Completed(&self.payload));
                    }
                }
                SubmitOutcome::Submitted
            }
            Err(err) => {
                warn!(widget = %self.widget_id, error = %err, "submission failed");
                let message = err.to_string();
                self.phase = WizardPhase::SubmitFailed;
                self.last_error = Some(message.clone());
                self.set_all_disabled(false);
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Sends the ticket through `gateway`, bounded by the submit timeout and
    /// raced against the session lock.
    pub async fn deliver<G>(&mut self, ticket: SubmissionTicket, gateway: &G) -> SubmitOutcome
    where
        G: SubmissionGateway + ?Sized,
    {
        match self.phase {
            WizardPhase::Submitting => {}
            WizardPhase::LockedByTimeout => return SubmitOutcome::Locked,
            _ => return SubmitOutcome::Refused,
        }
        let limit = self.settings.submit_timeout();
        let lock_in = self.timer.remaining(Instant::now());
        let lock_deadline = async move {
            match lock_in {
                Some(wait) => tokio::time::sleep(wait).await,
                None => std::future::pending::<()>().await,
            }
        };
        let result = tokio::select! {
            outcome = tokio::time::timeout(limit, gateway.submit(&ticket.payload)) => {
                outcome.unwrap_or_else(|_| Err(GatewayError::Timeout(limit)))
            }
            _ = lock_deadline => {
                self.lock();
                return SubmitOutcome::Locked;
            }
        };
        self.finish_submit(result)
    }

    pub async fn submit<G>(&mut self, gateway: &G) -> SubmitOutcome
    where
        G: SubmissionGateway + ?Sized,
    {
        match self.begin_submit() {
            Some(ticket) => self.deliver(ticket, gateway).await,
            None if self.phase == WizardPhase::LockedByTimeout => SubmitOutcome::Locked,
            None => SubmitOutcome::Refused,
        }
    }

    /// Fires the session lock once the timer has run out.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.phase.is_terminal() || !self.timer.is_expired(now) {
            return false;
        }
        self.lock()
    }

    /// Terminal: disables every control for good.
    pub fn lock(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = WizardPhase::LockedByTimeout;
        self.timer.cancel();
        self.close_picker();
        self.set_all_disabled(true);
        info!(widget = %self.widget_id, "session locked by timeout");
        if !self.notified {
            self.notified = true;
            if let Some(notifier) = self.notifier.as_mut() {
                notifier.notify(HostEvent::Locked);
            }
        }
        true
    }

    pub fn set_text(&mut self, field_id: &str, text: impl Into<String>) -> bool {
        let changed = self
            .editable_field(field_id)
            .map(|field| field.set_text(text))
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    pub fn type_char(&mut self, field_id: &str, c: char) -> bool {
        let changed = self
            .editable_field(field_id)
            .map(|field| field.push_char(c))
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    pub fn backspace(&mut self, field_id: &str) -> bool {
        let changed = self
            .editable_field(field_id)
            .map(FieldState::pop_char)
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    pub fn set_toggle(&mut self, field_id: &str, value: bool) -> bool {
        let changed = self
            .editable_field(field_id)
            .map(|field| field.set_toggle(value))
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    pub fn pick_option(&mut self, field_id: &str, option_id: &str) -> ToggleOutcome {
        let Some((outcome, cap)) = self.editable_field(field_id).and_then(|field| {
            let picker = field.picker_mut()?;
            let outcome = picker.toggle(option_id);
            Some((outcome, picker.cap()))
        }) else {
            return ToggleOutcome::Unknown;
        };
        if outcome == ToggleOutcome::CapacityReached {
            let max = cap.unwrap_or_default();
            self.raise_notice(field_id, NoticeKind::MaxSelection { max });
        } else {
            self.after_edit(field_id, outcome.changed());
        }
        outcome
    }

    pub fn select_all(&mut self, field_id: &str) -> bool {
        let changed = self
            .editable_field(field_id)
            .and_then(FieldState::picker_mut)
            .map(|picker| picker.select_all())
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    pub fn clear_all(&mut self, field_id: &str) -> bool {
        let changed = self
            .editable_field(field_id)
            .and_then(FieldState::picker_mut)
            .map(|picker| picker.clear_all())
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    pub fn open_picker_id(&self) -> Option<&str> {
        self.open_picker.as_deref()
    }

    /// Opens `field_id`'s picker, closing any other one first.
    pub fn open_picker(&mut self, field_id: &str) -> bool {
        if self
            .editable_field(field_id)
            .and_then(FieldState::picker_mut)
            .is_none()
        {
            return false;
        }
        self.close_picker();
        if let Some(picker) = find_field_mut(&mut self.steps, field_id).and_then(FieldState::picker_mut) {
            picker.set_open(true);
            self.open_picker = Some(field_id.to_string());
        }
        true
    }

    pub fn close_picker(&mut self) {
        let Some(open) = self.open_picker.take() else {
            return;
        };
        if let Some(picker) = find_field_mut(&mut self.steps, &open).and_then(FieldState::picker_mut) {
            picker.set_open(false);
        }
    }

    pub fn move_picker_cursor(&mut self, delta: i32) -> bool {
        let Some(open) = self.open_picker.clone() else {
            return false;
        };
        match find_field_mut(&mut self.steps, &open).and_then(FieldState::picker_mut) {
            Some(picker) => {
                picker.move_cursor(delta);
                true
            }
            None => false,
        }
    }

    /// Inert (returns `false`) for past or non-working dates.
    pub fn select_date(&mut self, field_id: &str, date: NaiveDate) -> bool {
        let today = self.today;
        let changed = self
            .editable_field(field_id)
            .and_then(FieldState::calendar_mut)
            .map(|calendar| calendar.select_date(date, today))
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    pub fn select_time(&mut self, field_id: &str, time: TimeOfDay) -> bool {
        let changed = self
            .editable_field(field_id)
            .and_then(FieldState::calendar_mut)
            .map(|calendar| calendar.select_time(time))
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    pub fn navigate_month(&mut self, field_id: &str, delta: i32) -> bool {
        self.editable_field(field_id)
            .and_then(FieldState::calendar_mut)
            .map(|calendar| calendar.navigate_month(delta))
            .is_some()
    }

    pub fn confirm_slot(&mut self, field_id: &str) -> ConfirmOutcome {
        let Some((outcome, max)) = self
            .editable_field(field_id)
            .and_then(FieldState::calendar_mut)
            .map(|calendar| (calendar.confirm_slot(), calendar.max_slots()))
        else {
            return ConfirmOutcome::Incomplete;
        };
        match outcome {
            ConfirmOutcome::CapacityReached => {
                self.raise_notice(field_id, NoticeKind::MaxSlots { max });
            }
            ConfirmOutcome::Confirmed => {
                self.after_edit(field_id, true);
            }
            ConfirmOutcome::Duplicate | ConfirmOutcome::Incomplete => {}
        }
        outcome
    }

    pub fn remove_slot(&mut self, field_id: &str, slot_id: &str) -> bool {
        let changed = self
            .editable_field(field_id)
            .and_then(FieldState::calendar_mut)
            .map(|calendar| calendar.remove_slot(slot_id))
            .unwrap_or(false);
        self.after_edit(field_id, changed)
    }

    fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    fn enter_step(&mut self, index: usize) {
        self.phase = WizardPhase::Step(index);
        self.cursor = index;
        debug!(step = index + 1, total = self.steps.len(), "entered step");
    }

    /// Visible, enabled field on the active step.
    fn editable_field(&mut self, field_id: &str) -> Option<&mut FieldState> {
        if !self.accepts_input() {
            return None;
        }
        let index = self.active_index()?;
        self.steps
            .get_mut(index)?
            .field_mut(field_id)
            .filter(|field| field.visible && !field.disabled)
    }

    fn after_edit(&mut self, field_id: &str, changed: bool) -> bool {
        if !changed {
            return false;
        }
        if self
            .notice
            .as_ref()
            .is_some_and(|notice| notice.field_id == field_id)
        {
            self.notice = None;
        }
        let adjusted = self.graph.evaluate(field_id, &mut self.steps);
        self.forget_hidden(&adjusted);
        if let Some(field) = find_field_mut(&mut self.steps, field_id) {
            revalidate_field(field, &self.bundle.messages);
        }
        true
    }

    /// Drops the open picker and notice of fields a rule just hid.
    fn forget_hidden(&mut self, adjusted: &[String]) {
        for id in adjusted {
            if self.field(id).is_some_and(|field| field.visible) {
                continue;
            }
            if self.open_picker.as_deref() == Some(id.as_str()) {
                self.close_picker();
            }
            if self.notice.as_ref().is_some_and(|notice| &notice.field_id == id) {
                self.notice = None;
            }
        }
    }

    fn raise_notice(&mut self, field_id: &str, kind: NoticeKind) {
        let messages = &self.bundle.messages;
        let message = match kind {
            NoticeKind::MaxSelection { max } => messages.max_selection(max),
            NoticeKind::MaxSlots { max } => messages.max_slots(max),
        };
        debug!(field = field_id, %message, "capacity notice");
        self.notice = Some(Notice {
            field_id: field_id.to_string(),
            kind,
            message,
        });
    }

    fn set_all_disabled(&mut self, disabled: bool) {
        for step in &mut self.steps {
            step.set_disabled(disabled);
        }
    }
}

fn find_field_mut<'a>(steps: &'a mut [StepState], field_id: &str) -> Option<&'a mut FieldState> {
    steps.iter_mut().find_map(|step| step.field_mut(field_id))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::wizard::gateway::AcceptAll;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn definition() -> WizardDefinition {
        serde_json::from_value(json!({
            "id": "demo",
            "steps": [
                {"id": "about", "fields": [
                    {"id": "email", "type": "text", "format": "email", "required": true},
                    {"id": "topic", "type": "choice", "required": true},
                    {"id": "topic_other", "type": "text", "hidden": true}
                ]},
                {"id": "finish", "fields": [
                    {"id": "channels", "type": "choice", "multiple": true, "max": 2},
                    {"id": "consent", "type": "toggle", "required": true}
                ]}
            ],
            "rules": [
                {"trigger": "topic", "when": {"kind": "equals", "value": "other"}, "dependents": ["topic_other"]}
            ],
            "settings": {"timeout_secs": 60, "submit_timeout_secs": 5},
            "locales": {"en": {"options": {
                "topic": [{"id": "sales", "label": "Sales"}, {"id": "other", "label": "Other"}],
                "channels": [
                    {"id": "mail", "label": "Mail"},
                    {"id": "phone", "label": "Phone"},
                    {"id": "sms", "label": "SMS"}
                ]
            }}}
        }))
        .expect("definition")
    }

    fn session() -> WizardSession {
        WizardSession::builder(&definition())
            .with_today(today())
            .build()
            .expect("session")
    }

    fn fill_first_step(session: &mut WizardSession) {
        assert!(session.set_text("email", "ada@example.com"));
        assert_eq!(session.pick_option("topic", "sales"), ToggleOutcome::Selected);
    }

    struct Refuse;

    #[async_trait(?Send)]
    impl SubmissionGateway for Refuse {
        async fn submit(&self, _payload: &Payload) -> Result<(), GatewayError> {
            Err(GatewayError::Rejected("503".into()))
        }
    }

    struct Stall;

    #[async_trait(?Send)]
    impl SubmissionGateway for Stall {
        async fn submit(&self, _payload: &Payload) -> Result<(), GatewayError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[test]
    fn starts_on_welcome_and_blocks_invalid_step() {
        let mut session = session();
        assert_eq!(session.phase(), WizardPhase::Welcome);
        assert_eq!(session.progress().percent, 0);
        assert!(!session.set_text("email", "x"), "no edits before start");

        assert!(session.start());
        assert_eq!(session.phase(), WizardPhase::Step(0));
        session.set_text("email", "not-an-email");
        match session.next() {
            NextOutcome::Blocked(report) => {
                assert_eq!(report.error_ids(), vec!["email", "topic"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(session.phase(), WizardPhase::Step(0));
        assert!(session.field("email").unwrap().error_visible());

        session.set_text("email", "ada@example.com");
        assert!(!session.field("email").unwrap().error_visible());
    }

    #[test]
    fn other_option_reveals_and_requires_free_text() {
        let mut session = session();
        session.start();
        session.set_text("email", "ada@example.com");
        session.pick_option("topic", "other");
        let other = session.field("topic_other").unwrap();
        assert!(other.visible && other.required);
        assert!(matches!(session.next(), NextOutcome::Blocked(_)));

        session.set_text("topic_other", "Partnership");
        session.pick_option("topic", "sales");
        assert!(!session.field("topic_other").unwrap().visible);
        assert!(matches!(session.next(), NextOutcome::Advanced));
        assert!(session.payload().get("topic_other").is_none());
    }

    #[test]
    fn previous_keeps_values_and_progress_tracks_index() {
        let mut session = session();
        session.start();
        fill_first_step(&mut session);
        assert!(matches!(session.next(), NextOutcome::Advanced));
        assert_eq!(session.progress().percent, 100);
        assert!(session.previous());
        assert_eq!(session.phase(), WizardPhase::Step(0));
        assert_eq!(session.field("email").unwrap().text(), Some("ada@example.com"));
        assert!(session.previous());
        assert_eq!(session.phase(), WizardPhase::Welcome);
        assert!(!session.previous());
    }

    #[test]
    fn capacity_raises_notice_without_changing_selection() {
        let mut session = session();
        session.start();
        fill_first_step(&mut session);
        session.next();
        session.pick_option("channels", "mail");
        session.pick_option("channels", "phone");
        assert_eq!(
            session.pick_option("channels", "sms"),
            ToggleOutcome::CapacityReached
        );
        let notice = session.notice().expect("notice");
        assert_eq!(notice.kind, NoticeKind::MaxSelection { max: 2 });
        assert_eq!(
            session.field("channels").unwrap().picker().unwrap().selected_ids(),
            vec!["mail", "phone"]
        );
        session.pick_option("channels", "mail");
        assert!(session.notice().is_none());
    }

    #[test]
    fn only_one_picker_is_open() {
        let mut session = session();
        session.start();
        assert!(session.open_picker("topic"));
        assert_eq!(session.open_picker_id(), Some("topic"));
        assert!(!session.open_picker("channels"), "not on the active step");
        assert_eq!(session.open_picker_id(), Some("topic"));
        session.next();
        assert_eq!(session.open_picker_id(), None);
    }

    #[tokio::test]
    async fn successful_submit_notifies_host_once() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut session = WizardSession::builder(&definition())
            .with_today(today())
            .with_notifier(move |event: HostEvent<'_>| {
                let name = match event {
                    HostEvent::Completed(payload) => format!("completed:{}", payload.len()),
                    HostEvent::Locked => "locked".to_string(),
                };
                sink.borrow_mut().push(name);
            })
            .build()
            .expect("session");
        session.start();
        fill_first_step(&mut session);
        session.next();
        session.set_toggle("consent", true);

        let NextOutcome::ReadyToSubmit(ticket) = session.next() else {
            panic!("expected submission");
        };
        assert_eq!(session.phase(), WizardPhase::Submitting);
        assert!(session.begin_submit().is_none(), "no second submission");
        assert!(session.all_fields_disabled());

        assert_eq!(session.deliver(ticket, &AcceptAll).await, SubmitOutcome::Submitted);
        assert_eq!(session.phase(), WizardPhase::Submitted);
        assert!(!session.lock());
        assert!(!session.tick(Instant::now() + Duration::from_secs(3600)));
        assert_eq!(events.borrow().as_slice(), ["completed:3"]);
    }

    #[tokio::test]
    async fn failed_submit_reenables_and_allows_retry() {
        let mut session = session();
        session.start();
        fill_first_step(&mut session);
        session.next();
        session.set_toggle("consent", true);

        let outcome = session.submit(&Refuse).await;
        assert_eq!(outcome, SubmitOutcome::Failed("submission rejected: 503".into()));
        assert_eq!(session.phase(), WizardPhase::SubmitFailed);
        assert!(session.last_error().is_some());
        assert!(!session.all_fields_disabled());
        assert!(session.set_toggle("consent", false));
        assert!(session.set_toggle("consent", true));

        assert_eq!(session.submit(&AcceptAll).await, SubmitOutcome::Submitted);
        assert!(session.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_gateway_times_out() {
        let mut session = WizardSession::builder(&definition())
            .with_today(today())
            .build()
            .expect("session");
        session.start();
        fill_first_step(&mut session);
        session.next();
        session.set_toggle("consent", true);
        let outcome = session.submit(&Stall).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(message) if message.contains("timed out")));
        assert_eq!(session.phase(), WizardPhase::SubmitFailed);
    }

    #[test]
    fn tick_locks_after_deadline() {
        let started = Instant::now();
        let mut session = WizardSession::builder(&definition())
            .with_today(today())
            .with_started_at(started)
            .build()
            .expect("session");
        session.start();
        assert!(!session.tick(started + Duration::from_secs(59)));
        assert!(session.open_picker("topic"));
        assert!(session.tick(started + Duration::from_secs(60)));
        assert_eq!(session.phase(), WizardPhase::LockedByTimeout);
        assert!(session.all_fields_disabled());
        assert_eq!(session.open_picker_id(), None);
        assert!(!session.set_text("email", "late@example.com"));
        assert!(matches!(session.next(), NextOutcome::Ignored));
        assert_eq!(session.finish_submit(Ok(())), SubmitOutcome::Locked);
    }

    fn cross_step_definition() -> WizardDefinition {
        serde_json::from_value(json!({
            "id": "cross",
            "steps": [
                {"id": "basics", "fields": [
                    {"id": "name", "type": "text", "required": true},
                    {"id": "detail", "type": "text", "hidden": true},
                    {"id": "nickname", "type": "text"}
                ]},
                {"id": "extras", "fields": [
                    {"id": "wants_detail", "type": "toggle"},
                    {"id": "skip_nickname", "type": "toggle"}
                ]}
            ],
            "rules": [
                {"trigger": "wants_detail", "when": {"kind": "is_true"}, "dependents": ["detail"]},
                {"trigger": "skip_nickname", "when": {"kind": "is_true"}, "dependents": ["nickname"],
                 "effect": "hide_optional"}
            ],
            "locales": {"en": {}}
        }))
        .expect("definition")
    }

    #[test]
    fn field_revealed_on_an_earlier_step_blocks_submission() {
        let mut session = WizardSession::builder(&cross_step_definition())
            .with_today(today())
            .build()
            .expect("session");
        session.start();
        session.set_text("name", "Ada");
        assert!(matches!(session.next(), NextOutcome::Advanced));
        assert!(session.set_toggle("wants_detail", true));
        let detail = session.field("detail").unwrap();
        assert!(detail.visible && detail.required);

        match session.next() {
            NextOutcome::Blocked(report) => assert_eq!(report.error_ids(), vec!["detail"]),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(session.phase(), WizardPhase::Step(0));
        assert!(session.field("detail").unwrap().error_visible());
        assert!(!session.all_fields_disabled());

        session.set_text("detail", "Corner unit");
        assert!(matches!(session.next(), NextOutcome::Advanced));
        let NextOutcome::ReadyToSubmit(ticket) = session.next() else {
            panic!("expected submission");
        };
        assert_eq!(
            ticket.payload.get("detail"),
            Some(&crate::form::PayloadValue::Text("Corner unit".into()))
        );
    }

    #[test]
    fn field_hidden_by_a_later_step_leaves_the_payload() {
        let mut session = WizardSession::builder(&cross_step_definition())
            .with_today(today())
            .build()
            .expect("session");
        session.start();
        session.set_text("name", "Ada");
        session.set_text("nickname", "Countess");
        session.next();
        assert!(session.payload().get("nickname").is_some());

        session.set_toggle("skip_nickname", true);
        let NextOutcome::ReadyToSubmit(ticket) = session.next() else {
            panic!("expected submission");
        };
        assert!(ticket.payload.get("nickname").is_none());
        assert!(session.payload().get("nickname").is_none());
        assert_eq!(session.field("nickname").unwrap().text(), Some("Countess"));
    }

    #[test]
    fn deliver_outside_submitting_sends_nothing() {
        let mut session = session();
        session.start();
        fill_first_step(&mut session);
        let ticket = SubmissionTicket {
            payload: session.payload().clone(),
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime");
        assert_eq!(
            runtime.block_on(session.deliver(ticket.clone(), &Refuse)),
            SubmitOutcome::Refused
        );
        assert_eq!(session.phase(), WizardPhase::Step(0));
        session.lock();
        assert_eq!(
            runtime.block_on(session.deliver(ticket, &AcceptAll)),
            SubmitOutcome::Locked
        );
    }

    #[test]
    fn hiding_a_field_closes_its_picker() {
        let definition: WizardDefinition = serde_json::from_value(json!({
            "id": "pets",
            "steps": [{"id": "home", "fields": [
                {"id": "has_pets", "type": "toggle"},
                {"id": "pets", "type": "choice", "multiple": true, "max": 1, "hidden": true}
            ]}],
            "rules": [{"trigger": "has_pets", "when": {"kind": "is_true"}, "dependents": ["pets"]}],
            "locales": {"en": {"options": {"pets": [
                {"id": "cat", "label": "Cat"},
                {"id": "dog", "label": "Dog"}
            ]}}}
        }))
        .expect("definition");
        let mut session = WizardSession::builder(&definition)
            .with_today(today())
            .build()
            .expect("session");
        session.start();
        session.set_toggle("has_pets", true);
        assert!(session.open_picker("pets"));
        session.pick_option("pets", "cat");
        assert_eq!(session.pick_option("pets", "dog"), ToggleOutcome::CapacityReached);
        assert!(session.notice().is_some());

        session.set_toggle("has_pets", false);
        assert!(!session.field("pets").unwrap().visible);
        assert_eq!(session.open_picker_id(), None);
        assert!(session.notice().is_none());
    }

    #[test]
    fn unknown_locale_falls_back_and_backfills_options() {
        let mut definition = definition();
        definition.locales.insert("fr".into(), LocaleBundle::new(Messages::french()));
        let session = WizardSession::new(&definition, HostParams::new().with_locale("fr"))
            .expect("session");
        assert_eq!(session.locale(), "fr");
        assert_eq!(session.field("topic").unwrap().picker().unwrap().options().len(), 2);

        let session = WizardSession::new(&definition, HostParams::new().with_locale("de"))
            .expect("session");
        assert_eq!(session.locale(), "en");
    }
}
