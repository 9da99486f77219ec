use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::calendar::TimeOfDay;

/// What kind of control has focus; decides how plain keys are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusKind {
    Text { multiline: bool },
    Toggle,
    Choice,
    Calendar,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    Next,
    Previous,
    FocusNext,
    FocusPrev,
    /// Open the picker, pick the highlighted option or confirm a slot.
    Activate,
    Escape,
    Toggle,
    SelectAll,
    ClearAll,
    PickerMove(i32),
    Day(i64),
    Month(i32),
    Time(TimeOfDay),
    RemoveLastSlot,
    Char(char),
    Backspace,
    None,
}

pub fn classify(key: &KeyEvent, focus: FocusKind, picker_open: bool) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => KeyCommand::Quit,
            KeyCode::Char('n') | KeyCode::Char('N') => KeyCommand::Next,
            KeyCode::Char('p') | KeyCode::Char('P') => KeyCommand::Previous,
            _ => KeyCommand::None,
        };
    }

    if picker_open {
        return match key.code {
            KeyCode::Up => KeyCommand::PickerMove(-1),
            KeyCode::Down => KeyCommand::PickerMove(1),
            KeyCode::Char(' ') => KeyCommand::Toggle,
            KeyCode::Enter => KeyCommand::Activate,
            KeyCode::Esc => KeyCommand::Escape,
            KeyCode::Char('a') => KeyCommand::SelectAll,
            KeyCode::Char('c') => KeyCommand::ClearAll,
            _ => KeyCommand::None,
        };
    }

    match key.code {
        KeyCode::Tab => return KeyCommand::FocusNext,
        KeyCode::BackTab => return KeyCommand::FocusPrev,
        KeyCode::Esc => return KeyCommand::Escape,
        _ => {}
    }

    match focus {
        FocusKind::Text { multiline } => match key.code {
            KeyCode::Enter if multiline => KeyCommand::Char('\n'),
            KeyCode::Enter => KeyCommand::Next,
            KeyCode::Backspace => KeyCommand::Backspace,
            KeyCode::Up => KeyCommand::FocusPrev,
            KeyCode::Down => KeyCommand::FocusNext,
            KeyCode::Char(c) => KeyCommand::Char(c),
            _ => KeyCommand::None,
        },
        FocusKind::Toggle => match key.code {
            KeyCode::Char(' ') => KeyCommand::Toggle,
            KeyCode::Enter => KeyCommand::Next,
            KeyCode::Up => KeyCommand::FocusPrev,
            KeyCode::Down => KeyCommand::FocusNext,
            _ => KeyCommand::None,
        },
        FocusKind::Choice => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => KeyCommand::Activate,
            KeyCode::Char('a') => KeyCommand::SelectAll,
            KeyCode::Char('c') => KeyCommand::ClearAll,
            KeyCode::Up => KeyCommand::FocusPrev,
            KeyCode::Down => KeyCommand::FocusNext,
            _ => KeyCommand::None,
        },
        FocusKind::Calendar => match key.code {
            KeyCode::Left => KeyCommand::Day(-1),
            KeyCode::Right => KeyCommand::Day(1),
            KeyCode::Up => KeyCommand::Day(-7),
            KeyCode::Down => KeyCommand::Day(7),
            KeyCode::PageUp => KeyCommand::Month(-1),
            KeyCode::PageDown => KeyCommand::Month(1),
            KeyCode::Char('m') => KeyCommand::Time(TimeOfDay::Morning),
            KeyCode::Char('p') => KeyCommand::Time(TimeOfDay::Afternoon),
            KeyCode::Char('d') | KeyCode::Delete => KeyCommand::RemoveLastSlot,
            KeyCode::Enter => KeyCommand::Activate,
            _ => KeyCommand::None,
        },
        FocusKind::Nothing => match key.code {
            KeyCode::Enter => KeyCommand::Next,
            _ => KeyCommand::None,
        },
    }
}
