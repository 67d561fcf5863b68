use digit_pad::pad::messages::OutcomeDisposition;
use digit_pad::pad::model::{Color, Point};
use digit_pad::pad::state::TriggerState;
use digit_pad::pad::{DigitPad, PadConfig, PredictClient, SubmitError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const SETTLE: Duration = Duration::from_secs(5);

#[derive(Default)]
struct QueueClient {
    responses: Mutex<VecDeque<Result<Vec<f64>, SubmitError>>>,
    calls: Mutex<usize>,
}

impl QueueClient {
    fn with(responses: Vec<Result<Vec<f64>, SubmitError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl PredictClient for QueueClient {
    fn predict(&self, _image_data_uri: &str) -> Result<Vec<f64>, SubmitError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SubmitError::MissingPrediction { error: None }))
    }
}

fn ready_pad(client: Arc<QueueClient>) -> DigitPad {
    let mut pad = DigitPad::new(PadConfig::default(), client);
    pad.initialize().unwrap();
    pad
}

fn draw_line(pad: &mut DigitPad, from: (f32, f32), to: (f32, f32), now: Instant) {
    pad.pointer_down(from.into());
    pad.pointer_move(to.into(), now);
    pad.pointer_up(now);
}

fn submit_and_settle(pad: &mut DigitPad, at: Instant) -> Vec<OutcomeDisposition> {
    let mut outcomes = pad.tick(at);
    outcomes.extend(pad.settle(SETTLE));
    outcomes
}

fn ten(scores: &[f64]) -> Vec<f64> {
    let mut out = scores.to_vec();
    out.resize(10, 0.0);
    out
}

#[test]
fn clear_after_any_strokes_restores_blank_state() {
    let client = QueueClient::with(vec![Ok(ten(&[0.0, 0.0, 1.0]))]);
    let mut pad = ready_pad(client);
    let start = Instant::now();

    let strokes = [
        ((10.0, 10.0), (270.0, 270.0)),
        ((270.0, 10.0), (10.0, 270.0)),
        ((140.0, 0.0), (140.0, 279.0)),
    ];
    for (from, to) in strokes {
        draw_line(&mut pad, from, to, start);
    }
    submit_and_settle(&mut pad, start + Duration::from_millis(300));
    assert_eq!(pad.prediction_text(), "2");

    pad.clear();
    assert!(pad.raster().unwrap().is_uniform(Color::WHITE));
    assert_eq!(pad.prediction_text(), "...");
}

#[test]
fn bursts_within_quiet_period_submit_once() {
    let client = QueueClient::with(vec![Ok(ten(&[1.0]))]);
    let mut pad = ready_pad(client.clone());
    let start = Instant::now();

    pad.pointer_down(Point::new(20.0, 20.0));
    let mut last = start;
    for step in 0..20u64 {
        last = start + Duration::from_millis(step * 50);
        pad.pointer_move(Point::new(20.0 + step as f32 * 10.0, 40.0), last);
        assert!(pad.tick(last).is_empty());
    }
    pad.pointer_up(last);

    assert!(pad.tick(last + Duration::from_millis(299)).is_empty());
    assert_eq!(pad.trigger_state(), TriggerState::Scheduled);
    submit_and_settle(&mut pad, last + Duration::from_millis(300));
    submit_and_settle(&mut pad, last + Duration::from_secs(3));

    assert_eq!(client.calls(), 1);
    assert_eq!(pad.trigger().submissions(), 1);
}

#[test]
fn highest_score_wins_and_ties_pick_first() {
    let client = QueueClient::with(vec![
        Ok(ten(&[0.1, 0.9, 0.05])),
        Ok(ten(&[0.5, 0.5])),
    ]);
    let mut pad = ready_pad(client);
    let start = Instant::now();

    draw_line(&mut pad, (30.0, 30.0), (90.0, 90.0), start);
    submit_and_settle(&mut pad, start + Duration::from_millis(300));
    assert_eq!(pad.prediction_text(), "1");

    let later = start + Duration::from_secs(1);
    draw_line(&mut pad, (30.0, 90.0), (90.0, 30.0), later);
    submit_and_settle(&mut pad, later + Duration::from_millis(300));
    assert_eq!(pad.prediction_text(), "0");
}

#[test]
fn error_response_leaves_prediction_untouched() {
    let client = QueueClient::with(vec![
        Err(SubmitError::MissingPrediction {
            error: Some("bad image".into()),
        }),
        Ok(ten(&[0.0, 0.0, 0.0, 0.0, 0.8])),
        Err(SubmitError::Transport {
            url: "http://127.0.0.1:1/predict".into(),
            message: "connection refused".into(),
        }),
    ]);
    let mut pad = ready_pad(client);
    let mut now = Instant::now();

    draw_line(&mut pad, (10.0, 10.0), (50.0, 50.0), now);
    let outcomes = submit_and_settle(&mut pad, now + Duration::from_millis(300));
    assert_eq!(outcomes, vec![OutcomeDisposition::SoftFailure]);
    assert_eq!(pad.prediction_text(), "...");

    now += Duration::from_secs(1);
    draw_line(&mut pad, (10.0, 50.0), (50.0, 10.0), now);
    submit_and_settle(&mut pad, now + Duration::from_millis(300));
    assert_eq!(pad.prediction_text(), "4");

    now += Duration::from_secs(1);
    draw_line(&mut pad, (100.0, 100.0), (150.0, 150.0), now);
    let outcomes = submit_and_settle(&mut pad, now + Duration::from_millis(300));
    assert_eq!(outcomes, vec![OutcomeDisposition::SoftFailure]);
    assert_eq!(pad.prediction_text(), "4");
    assert_eq!(pad.trigger_state(), TriggerState::Idle);
}

#[test]
fn leaving_mid_stroke_allows_a_fresh_stroke() {
    let client = QueueClient::with(Vec::new());
    let mut pad = ready_pad(client);
    let now = Instant::now();

    pad.pointer_down(Point::new(100.0, 100.0));
    pad.pointer_move(Point::new(279.0, 100.0), now);
    pad.pointer_leave(now);
    assert!(!pad.surface().is_drawing());
    assert_eq!(pad.trigger_state(), TriggerState::Scheduled);

    pad.pointer_down(Point::new(5.0, 5.0));
    pad.pointer_move(Point::new(5.0, 60.0), now);
    let stroke = pad.surface().active_stroke().unwrap();
    assert_eq!(stroke.points.first(), Some(&Point::new(5.0, 5.0)));
    assert_eq!(stroke.points.len(), 2);

    // The new stroke is not joined to where the old one left off.
    let raster = pad.raster().unwrap();
    assert_eq!(raster.pixel(150, 50), Color::WHITE);
}
