use crate::pad::capture::capture_payload;
use crate::pad::client::{PredictClient, SubmitError};
use crate::pad::debounce::Debouncer;
use crate::pad::messages::{OutcomeDisposition, StalePolicy, SubmissionOutcome};
use crate::pad::model::Prediction;
use crate::pad::raster::Raster;
use crate::pad::state::TriggerState;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Debounced submission of the capture surface to the classifier.
pub struct InferenceTrigger {
    debouncer: Debouncer,
    client: Arc<dyn PredictClient>,
    policy: StalePolicy,
    outcome_tx: Sender<SubmissionOutcome>,
    outcome_rx: Receiver<SubmissionOutcome>,
    next_seq: u64,
    in_flight: usize,
    /// Lowest sequence number still allowed to update the prediction.
    accept_from: u64,
    displayed_seq: Option<u64>,
    prediction: Option<Prediction>,
    submissions: u64,
}

impl InferenceTrigger {
    pub fn new(client: Arc<dyn PredictClient>, quiet: Duration, policy: StalePolicy) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        Self {
            debouncer: Debouncer::new(quiet),
            client,
            policy,
            outcome_tx,
            outcome_rx,
            next_seq: 0,
            in_flight: 0,
            accept_from: 0,
            displayed_seq: None,
            prediction: None,
            submissions: 0,
        }
    }

    pub fn state(&self) -> TriggerState {
        TriggerState::derive(self.debouncer.is_pending(), self.in_flight)
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Number of submissions dispatched so far.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_remaining(now)
    }

    pub fn schedule_submission(&mut self, now: Instant) {
        let replaced = self.debouncer.arm(now);
        tracing::debug!(replaced, in_flight = self.in_flight, "submission scheduled");
    }

    pub fn cancel_pending(&mut self) -> bool {
        self.debouncer.cancel()
    }

    /// Drops the displayed prediction. Under [`StalePolicy::DiscardStale`] any
    /// request already in flight is also prevented from repopulating it.
    pub fn reset_prediction(&mut self) {
        self.prediction = None;
        self.displayed_seq = None;
        if self.policy == StalePolicy::DiscardStale {
            self.accept_from = self.next_seq;
        }
    }

    /// Fires the pending submission when its quiet period has elapsed.
    /// Returns the sequence number of the dispatched request.
    pub fn tick(&mut self, now: Instant, raster: Option<&Raster>) -> Option<u64> {
        self.debouncer.fire_if_due(now)?;
        let Some(raster) = raster else {
            tracing::debug!("submission fired without an initialized surface; skipping");
            return None;
        };
        self.submit(raster)
    }

    fn submit(&mut self, raster: &Raster) -> Option<u64> {
        let seq = self.next_seq;
        self.next_seq += 1;

        let payload = match capture_payload(raster) {
            Ok(payload) => payload,
            Err(err) => {
                let err = SubmitError::Encode(format!("{err:#}"));
                tracing::warn!(seq, error = %err, "prediction skipped");
                return None;
            }
        };

        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("predict-{seq}"))
            .spawn(move || {
                let result = client.predict(&payload);
                let _ = tx.send(SubmissionOutcome { seq, result });
            });
        if let Err(err) = spawned {
            tracing::warn!(seq, error = %err, "failed to spawn prediction worker");
            return None;
        }

        self.in_flight += 1;
        self.submissions += 1;
        tracing::info!(seq, in_flight = self.in_flight, "prediction submitted");
        Some(seq)
    }

    /// Applies every outcome that has already arrived.
    pub fn pump(&mut self) -> Vec<OutcomeDisposition> {
        let mut applied = Vec::new();
        loop {
            match self.outcome_rx.try_recv() {
                Ok(outcome) => applied.push(self.apply(outcome)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    /// Blocks for at most `timeout` waiting for the next outcome.
    pub fn wait_for_outcome(&mut self, timeout: Duration) -> Option<OutcomeDisposition> {
        if self.in_flight == 0 {
            return None;
        }
        match self.outcome_rx.recv_timeout(timeout) {
            Ok(outcome) => Some(self.apply(outcome)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Waits until no request is in flight or `timeout` elapses.
    pub fn settle(&mut self, timeout: Duration) -> Vec<OutcomeDisposition> {
        let deadline = Instant::now() + timeout;
        let mut applied = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.wait_for_outcome(remaining) {
                Some(disposition) => applied.push(disposition),
                None => break,
            }
        }
        applied
    }

    fn apply(&mut self, outcome: SubmissionOutcome) -> OutcomeDisposition {
        self.in_flight = self.in_flight.saturating_sub(1);
        let SubmissionOutcome { seq, result } = outcome;

        let scores = match result {
            Ok(scores) => scores,
            Err(err) => {
                tracing::warn!(seq, error = %err, "prediction failed");
                return OutcomeDisposition::SoftFailure;
            }
        };

        if self.policy == StalePolicy::DiscardStale && self.is_stale(seq) {
            tracing::debug!(seq, displayed = ?self.displayed_seq, "stale prediction discarded");
            return OutcomeDisposition::Stale;
        }

        match Prediction::from_scores(scores) {
            Some(prediction) => {
                let label = prediction.label;
                tracing::info!(
                    seq,
                    label,
                    confidence = prediction.confidence(),
                    "prediction updated"
                );
                self.prediction = Some(prediction);
                self.displayed_seq = Some(seq);
                OutcomeDisposition::Applied { label }
            }
            None => {
                tracing::warn!(seq, "prediction scores had no usable maximum");
                OutcomeDisposition::SoftFailure
            }
        }
    }

    fn is_stale(&self, seq: u64) -> bool {
        seq < self.accept_from || self.displayed_seq.is_some_and(|shown| seq < shown)
    }
}
