use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::debug;

use crate::{
    form::{FieldState, FieldValue, OptionPicker, Payload},
    presentation::{self, ViewContext},
    wizard::{
        CommandOutcome, SubmissionGateway, SubmissionTicket, SubmitOutcome, WizardCommand,
        WizardPhase, WizardSession, apply_command,
    },
};

use super::{
    input::{FocusKind, KeyCommand, classify},
    options::UiOptions,
    status::StatusLine,
    terminal::TerminalGuard,
};

const HELP_TEXT: &str = "Tab/Shift+Tab focus • Enter next/open • Esc back/close • Space toggle \
     • a/c select/clear all • arrows/PgUp/PgDn dates • m/p time • d remove slot • Ctrl+Q quit";

/// How a terminal session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Submitted(Payload),
    Locked,
    /// The user quit before finishing.
    Abandoned,
}

#[derive(Debug)]
pub(crate) enum Effect {
    None,
    Submit(SubmissionTicket),
}

pub(crate) struct App {
    session: WizardSession,
    options: UiOptions,
    status: StatusLine,
    /// Index into the visible fields of the active step.
    focus: usize,
    should_quit: bool,
}

impl App {
    pub fn new(session: WizardSession, options: UiOptions) -> Self {
        Self {
            session,
            options,
            status: StatusLine::new(),
            focus: 0,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn run<G>(mut self, terminal: &mut TerminalGuard, gateway: &G) -> Result<SessionOutcome>
    where
        G: SubmissionGateway + ?Sized,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("failed to start async runtime")?;

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.on_tick(Instant::now());
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if let Effect::Submit(ticket) = self.handle_key(key) {
                self.status.submitting();
                terminal.draw(|frame| self.draw(frame))?;
                let outcome = runtime.block_on(self.session.deliver(ticket, gateway));
                self.after_submit(outcome);
            }
        }
        Ok(self.outcome())
    }

    pub fn outcome(&self) -> SessionOutcome {
        match self.session.phase() {
            WizardPhase::Submitted => SessionOutcome::Submitted(self.session.payload().clone()),
            WizardPhase::LockedByTimeout => SessionOutcome::Locked,
            _ => SessionOutcome::Abandoned,
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.session.tick(now) {
            self.status.locked();
        }
    }

    pub fn after_submit(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Submitted => self.status.submitted(),
            SubmitOutcome::Failed(reason) => self.status.submit_failed(&reason),
            SubmitOutcome::Locked => self.status.locked(),
            SubmitOutcome::Refused => self.status.ready(),
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let focus = self.focused_field().map(|field| field.id.as_str());
        let ctx = ViewContext {
            focus,
            status: self.status.message(),
            help: self.options.show_help.then_some(HELP_TEXT),
        };
        presentation::render(frame, frame.area(), &self.session, &ctx);
    }

    fn focused_field(&self) -> Option<&FieldState> {
        self.session.active_step()?.visible_fields().nth(self.focus)
    }

    fn focus_kind(&self) -> FocusKind {
        match self.focused_field().map(|field| (&field.value, field.multiline)) {
            Some((FieldValue::Text(_), multiline)) => FocusKind::Text { multiline },
            Some((FieldValue::Toggle(_), _)) => FocusKind::Toggle,
            Some((FieldValue::Choice(_), _)) => FocusKind::Choice,
            Some((FieldValue::Slots(_), _)) => FocusKind::Calendar,
            None => FocusKind::Nothing,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        if key.kind != KeyEventKind::Press {
            return Effect::None;
        }
        if self.session.phase().is_terminal() {
            self.should_quit = true;
            return Effect::None;
        }

        let picker_open = self.session.open_picker_id().is_some();
        let command = classify(&key, self.focus_kind(), picker_open);
        debug!(?command, "key");
        let step_before = self.session.active_index();
        let focused = self.focused_field().map(|field| field.id.clone());
        let field = || focused.clone().unwrap_or_default();

        let outcome = match command {
            KeyCommand::Quit => {
                self.should_quit = true;
                return Effect::None;
            }
            KeyCommand::Next => self.apply(WizardCommand::Next),
            KeyCommand::Previous => self.apply(WizardCommand::Previous),
            KeyCommand::Escape if picker_open => self.apply(WizardCommand::ClosePicker),
            KeyCommand::Escape => self.apply(WizardCommand::Previous),
            KeyCommand::FocusNext => {
                self.move_focus(1);
                CommandOutcome::Unchanged
            }
            KeyCommand::FocusPrev => {
                self.move_focus(-1);
                CommandOutcome::Unchanged
            }
            KeyCommand::Activate => self.activate(field()),
            KeyCommand::Toggle if picker_open => self.pick_highlighted(),
            KeyCommand::Toggle => {
                let value = self
                    .focused_field()
                    .and_then(FieldState::toggle_value)
                    .unwrap_or(false);
                self.apply(WizardCommand::SetToggle {
                    field: field(),
                    value: !value,
                })
            }
            KeyCommand::SelectAll => {
                let field = self.picker_target(field());
                self.apply(WizardCommand::SelectAll { field })
            }
            KeyCommand::ClearAll => {
                let field = self.picker_target(field());
                self.apply(WizardCommand::ClearAll { field })
            }
            KeyCommand::PickerMove(delta) => self.apply(WizardCommand::MovePickerCursor(delta)),
            KeyCommand::Day(delta) => self.step_date(field(), delta),
            KeyCommand::Month(delta) => self.apply(WizardCommand::NavigateMonth {
                field: field(),
                delta,
            }),
            KeyCommand::Time(time) => self.apply(WizardCommand::SelectTime {
                field: field(),
                time,
            }),
            KeyCommand::RemoveLastSlot => {
                let last = self
                    .focused_field()
                    .and_then(FieldState::calendar)
                    .and_then(|calendar| calendar.slots().last())
                    .map(|slot| slot.id());
                match last {
                    Some(slot) => self.apply(WizardCommand::RemoveSlot {
                        field: field(),
                        slot,
                    }),
                    None => CommandOutcome::Unchanged,
                }
            }
            KeyCommand::Char(ch) => self.apply(WizardCommand::TypeChar { field: field(), ch }),
            KeyCommand::Backspace => self.apply(WizardCommand::Backspace { field: field() }),
            KeyCommand::None => CommandOutcome::Unchanged,
        };
        if self.session.active_index() != step_before {
            self.focus = 0;
            if matches!(outcome, CommandOutcome::Changed) {
                let progress = self.session.progress();
                self.status.step(progress.current, progress.total);
            }
        }
        self.after_command(outcome)
    }

    fn apply(&mut self, command: WizardCommand) -> CommandOutcome {
        apply_command(&mut self.session, command)
    }

    fn after_command(&mut self, outcome: CommandOutcome) -> Effect {
        match outcome {
            CommandOutcome::ReadyToSubmit(ticket) => return Effect::Submit(ticket),
            CommandOutcome::Blocked(report) => {
                self.status.issues_remaining(report.errors.len());
                if let Some(first) = report.errors.first() {
                    self.focus_on(&first.field_id);
                }
            }
            CommandOutcome::Capped => {
                if let Some(notice) = self.session.notice() {
                    self.status.set_raw(notice.message.clone());
                }
            }
            CommandOutcome::Changed | CommandOutcome::Unchanged => {}
        }
        self.clamp_focus();
        Effect::None
    }

    fn activate(&mut self, field: String) -> CommandOutcome {
        if self.session.open_picker_id().is_some() {
            let single = self
                .open_picker()
                .map(|picker| !picker.is_multi())
                .unwrap_or(false);
            let outcome = if single {
                self.pick_highlighted()
            } else {
                CommandOutcome::Unchanged
            };
            self.apply(WizardCommand::ClosePicker);
            return outcome;
        }
        match self.focus_kind() {
            FocusKind::Choice => self.apply(WizardCommand::OpenPicker { field }),
            FocusKind::Calendar => self.apply(WizardCommand::ConfirmSlot { field }),
            _ => self.apply(WizardCommand::Next),
        }
    }

    fn open_picker(&self) -> Option<&OptionPicker> {
        let id = self.session.open_picker_id()?;
        self.session.field(id)?.picker()
    }

    fn picker_target(&self, focused: String) -> String {
        self.session
            .open_picker_id()
            .map(str::to_string)
            .unwrap_or(focused)
    }

    fn pick_highlighted(&mut self) -> CommandOutcome {
        let Some(field) = self.session.open_picker_id().map(str::to_string) else {
            return CommandOutcome::Unchanged;
        };
        let Some(option) = self
            .open_picker()
            .and_then(|picker| picker.cursor_option())
            .map(|option| option.id.clone())
        else {
            return CommandOutcome::Unchanged;
        };
        self.apply(WizardCommand::PickOption { field, option })
    }

    fn step_date(&mut self, field: String, delta: i64) -> CommandOutcome {
        let today = self.session.today();
        let target = self
            .focused_field()
            .and_then(FieldState::calendar)
            .and_then(|calendar| match calendar.selected_date() {
                Some(from) => calendar.step_selectable(from, delta, today),
                None => calendar.first_selectable_in_view(today),
            });
        match target {
            Some(date) => self.apply(WizardCommand::SelectDate { field, date }),
            None => CommandOutcome::Unchanged,
        }
    }

    fn visible_count(&self) -> usize {
        self.session
            .active_step()
            .map(|step| step.visible_fields().count())
            .unwrap_or(0)
    }

    fn move_focus(&mut self, delta: i32) {
        let count = self.visible_count();
        if count == 0 {
            self.focus = 0;
            return;
        }
        let next = (self.focus as i64 + i64::from(delta)).rem_euclid(count as i64);
        self.focus = next as usize;
    }

    fn focus_on(&mut self, field_id: &str) {
        if let Some(index) = self
            .session
            .active_step()
            .and_then(|step| step.visible_fields().position(|field| field.id == field_id))
        {
            self.focus = index;
        }
    }

    fn clamp_focus(&mut self) {
        let count = self.visible_count();
        if self.focus >= count {
            self.focus = count.saturating_sub(1);
        }
    }

    #[cfg(test)]
    pub(crate) fn focused_id(&self) -> Option<&str> {
        self.focused_field().map(|field| field.id.as_str())
    }
}
