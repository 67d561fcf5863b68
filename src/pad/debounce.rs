use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub armed_at: Instant,
    pub deadline: Instant,
}

/// Single-slot debounce timer. Arming replaces any pending deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<PendingTimer>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<PendingTimer> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns `true` when an earlier pending timer was superseded.
    pub fn arm(&mut self, now: Instant) -> bool {
        self.pending
            .replace(PendingTimer {
                armed_at: now,
                deadline: now + self.quiet,
            })
            .is_some()
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Consumes the pending timer if its deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<PendingTimer> {
        match self.pending {
            Some(timer) if now >= timer.deadline => self.pending.take(),
            _ => None,
        }
    }

    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|timer| timer.deadline.saturating_duration_since(now))
    }
}
