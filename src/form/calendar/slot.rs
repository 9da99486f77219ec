use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
}

impl TimeOfDay {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
        }
    }

    pub fn label(self, messages: &Messages) -> &str {
        match self {
            TimeOfDay::Morning => &messages.morning,
            TimeOfDay::Afternoon => &messages.afternoon,
        }
    }
}

/// A confirmed availability entry. Serializes as `{date, time}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: TimeOfDay,
}

impl Slot {
    pub fn new(date: NaiveDate, time: TimeOfDay) -> Self {
        Self { date, time }
    }

    /// Stable identifier, e.g. `2026-10-19-morning`.
    pub fn id(&self) -> String {
        format!("{}-{}", self.date.format("%Y-%m-%d"), self.time.as_str())
    }

    pub fn display_text(&self, messages: &Messages) -> String {
        format!(
            "{} ({})",
            self.date.format("%a %Y-%m-%d"),
            self.time.label(messages)
        )
    }
}
