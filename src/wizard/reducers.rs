use crate::form::{StepReport, ToggleOutcome, calendar::ConfirmOutcome};

use super::{
    actions::WizardCommand,
    session::{NextOutcome, SubmissionTicket, WizardSession},
};

#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Changed,
    Unchanged,
    Blocked(StepReport),
    ReadyToSubmit(SubmissionTicket),
    /// A capacity limit refused the change; the session holds the notice.
    Capped,
}

impl CommandOutcome {
    fn from_flag(changed: bool) -> Self {
        if changed {
            CommandOutcome::Changed
        } else {
            CommandOutcome::Unchanged
        }
    }
}

pub fn apply_command(session: &mut WizardSession, command: WizardCommand) -> CommandOutcome {
    use CommandOutcome::*;

    match command {
        WizardCommand::Start => CommandOutcome::from_flag(session.start()),
        WizardCommand::Next => match session.next() {
            NextOutcome::Advanced => Changed,
            NextOutcome::Blocked(report) => Blocked(report),
            NextOutcome::ReadyToSubmit(ticket) => ReadyToSubmit(ticket),
            NextOutcome::Ignored => Unchanged,
        },
        WizardCommand::Previous => CommandOutcome::from_flag(session.previous()),
        WizardCommand::SetText { field, value } => {
            CommandOutcome::from_flag(session.set_text(&field, value))
        }
        WizardCommand::TypeChar { field, ch } => {
            CommandOutcome::from_flag(session.type_char(&field, ch))
        }
        WizardCommand::Backspace { field } => CommandOutcome::from_flag(session.backspace(&field)),
        WizardCommand::SetToggle { field, value } => {
            CommandOutcome::from_flag(session.set_toggle(&field, value))
        }
        WizardCommand::PickOption { field, option } => match session.pick_option(&field, &option) {
            ToggleOutcome::CapacityReached => Capped,
            outcome => CommandOutcome::from_flag(outcome.changed()),
        },
        WizardCommand::SelectAll { field } => CommandOutcome::from_flag(session.select_all(&field)),
        WizardCommand::ClearAll { field } => CommandOutcome::from_flag(session.clear_all(&field)),
        WizardCommand::OpenPicker { field } => {
            CommandOutcome::from_flag(session.open_picker(&field))
        }
        WizardCommand::ClosePicker => {
            let was_open = session.open_picker_id().is_some();
            session.close_picker();
            CommandOutcome::from_flag(was_open)
        }
        WizardCommand::MovePickerCursor(delta) => {
            CommandOutcome::from_flag(session.move_picker_cursor(delta))
        }
        WizardCommand::SelectDate { field, date } => {
            CommandOutcome::from_flag(session.select_date(&field, date))
        }
        WizardCommand::SelectTime { field, time } => {
            CommandOutcome::from_flag(session.select_time(&field, time))
        }
        WizardCommand::ConfirmSlot { field } => match session.confirm_slot(&field) {
            ConfirmOutcome::Confirmed => Changed,
            ConfirmOutcome::CapacityReached => Capped,
            ConfirmOutcome::Duplicate | ConfirmOutcome::Incomplete => Unchanged,
        },
        WizardCommand::RemoveSlot { field, slot } => {
            CommandOutcome::from_flag(session.remove_slot(&field, &slot))
        }
        WizardCommand::NavigateMonth { field, delta } => {
            CommandOutcome::from_flag(session.navigate_month(&field, delta))
        }
    }
}
