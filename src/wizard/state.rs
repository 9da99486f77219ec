/// Where the session is in its lifecycle. `Step` holds a 0-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Welcome,
    Step(usize),
    Submitting,
    Submitted,
    /// The gateway refused or timed out; the user may correct and resend.
    SubmitFailed,
    LockedByTimeout,
}

impl WizardPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, WizardPhase::Submitted | WizardPhase::LockedByTimeout)
    }

    pub fn name(self) -> &'static str {
        match self {
            WizardPhase::Welcome => "welcome",
            WizardPhase::Step(_) => "step",
            WizardPhase::Submitting => "submitting",
            WizardPhase::Submitted => "submitted",
            WizardPhase::SubmitFailed => "submit-failed-retriable",
            WizardPhase::LockedByTimeout => "locked-by-timeout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based step number, 0 before the first step.
    pub current: usize,
    pub total: usize,
    pub percent: u16,
}

impl Progress {
    pub fn ratio(&self) -> f64 {
        f64::from(self.percent) / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    MaxSelection { max: usize },
    MaxSlots { max: usize },
}

/// Transient capacity notice shown next to its field. Never blocks navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub field_id: String,
    pub kind: NoticeKind,
    pub message: String,
}
