use std::time::{Duration, Instant};

/// Session-wide lock deadline. Checked on every tick; never reset by
/// step transitions.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimer {
    deadline: Option<Instant>,
}

impl SessionTimer {
    pub fn start(now: Instant, duration: Duration) -> Self {
        Self {
            deadline: now.checked_add(duration),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline.map(|deadline| now >= deadline).unwrap_or(false)
    }

    /// Time left before the lock fires, `None` once cancelled.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_at_deadline_and_cancel_disarms() {
        let start = Instant::now();
        let mut timer = SessionTimer::start(start, Duration::from_secs(900));
        assert!(!timer.is_expired(start + Duration::from_secs(899)));
        assert!(timer.is_expired(start + Duration::from_secs(900)));
        assert_eq!(
            timer.remaining(start + Duration::from_secs(600)),
            Some(Duration::from_secs(300))
        );
        timer.cancel();
        assert!(!timer.is_expired(start + Duration::from_secs(3600)));
        assert_eq!(timer.remaining(start), None);
    }
}
