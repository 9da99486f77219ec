use chrono::NaiveDate;

use crate::form::calendar::TimeOfDay;

/// Every user-driven change a session accepts, addressed by field id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardCommand {
    Start,
    Next,
    Previous,
    SetText { field: String, value: String },
    TypeChar { field: String, ch: char },
    Backspace { field: String },
    SetToggle { field: String, value: bool },
    PickOption { field: String, option: String },
    SelectAll { field: String },
    ClearAll { field: String },
    OpenPicker { field: String },
    ClosePicker,
    MovePickerCursor(i32),
    SelectDate { field: String, date: NaiveDate },
    SelectTime { field: String, time: TimeOfDay },
    ConfirmSlot { field: String },
    RemoveSlot { field: String, slot: String },
    NavigateMonth { field: String, delta: i32 },
}
