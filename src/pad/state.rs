#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Scheduled,
    InFlight,
}

impl TriggerState {
    /// Derived from the two independent facts the trigger tracks. A pending
    /// timer wins over an outstanding request since both may coexist.
    pub fn derive(timer_pending: bool, in_flight: usize) -> Self {
        if timer_pending {
            Self::Scheduled
        } else if in_flight > 0 {
            Self::InFlight
        } else {
            Self::Idle
        }
    }

    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }
}
