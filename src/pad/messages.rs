use crate::pad::client::SubmitError;

/// Sent back from a submission worker to the UI thread.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub seq: u64,
    pub result: Result<Vec<f64>, SubmitError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalePolicy {
    /// Whatever response arrives last is displayed.
    LastResponseWins,
    /// Responses older than the displayed one, or issued before a clear, are dropped.
    DiscardStale,
}

impl StalePolicy {
    pub fn from_flag(discard_stale: bool) -> Self {
        if discard_stale {
            Self::DiscardStale
        } else {
            Self::LastResponseWins
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeDisposition {
    Applied { label: usize },
    SoftFailure,
    Stale,
}
