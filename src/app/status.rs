#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Press Enter or Ctrl+N to continue.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn step(&mut self, current: usize, total: usize) {
        self.message = format!("Step {current} of {total}");
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) to fix before continuing");
    }

    pub fn submitting(&mut self) {
        self.message = "Sending...".to_string();
    }

    pub fn submitted(&mut self) {
        self.message = "Sent. Press any key to exit.".to_string();
    }

    pub fn submit_failed(&mut self, reason: &str) {
        self.message = format!("Send failed: {reason}. Press Enter to retry.");
    }

    pub fn locked(&mut self) {
        self.message = "Session expired. Press any key to exit.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
