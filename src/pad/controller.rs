use crate::pad::client::PredictClient;
use crate::pad::messages::{OutcomeDisposition, StalePolicy};
use crate::pad::model::{prediction_label, Point, Prediction, StrokeStyle};
use crate::pad::raster::Raster;
use crate::pad::state::TriggerState;
use crate::pad::surface::{CaptureSurface, SurfaceError, SurfaceEvent};
use crate::pad::trigger::InferenceTrigger;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadConfig {
    pub width: u32,
    pub height: u32,
    pub brush_width: u32,
    pub quiet_period: Duration,
    pub stale_policy: StalePolicy,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            width: crate::pad::model::SURFACE_WIDTH,
            height: crate::pad::model::SURFACE_HEIGHT,
            brush_width: crate::pad::model::DEFAULT_BRUSH_WIDTH,
            quiet_period: crate::pad::debounce::DEFAULT_QUIET_PERIOD,
            stale_policy: StalePolicy::LastResponseWins,
        }
    }
}

/// Routes pointer input to the capture surface and surface changes to the
/// inference trigger. Holds no window state.
pub struct DigitPad {
    surface: CaptureSurface,
    trigger: InferenceTrigger,
}

impl DigitPad {
    pub fn new(config: PadConfig, client: Arc<dyn PredictClient>) -> Self {
        let style = StrokeStyle {
            width: config.brush_width,
            ..StrokeStyle::default()
        };
        Self {
            surface: CaptureSurface::new(config.width, config.height, style),
            trigger: InferenceTrigger::new(client, config.quiet_period, config.stale_policy),
        }
    }

    pub fn initialize(&mut self) -> Result<(), SurfaceError> {
        self.surface.initialize()
    }

    pub fn surface(&self) -> &CaptureSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut CaptureSurface {
        &mut self.surface
    }

    pub fn trigger(&self) -> &InferenceTrigger {
        &self.trigger
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.surface.raster()
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.trigger.prediction()
    }

    pub fn prediction_text(&self) -> String {
        prediction_label(self.trigger.prediction())
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger.state()
    }

    pub fn brush_width(&self) -> u32 {
        self.surface.brush_width()
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.surface.begin_stroke(point);
    }

    pub fn pointer_move(&mut self, point: Point, now: Instant) {
        let event = self.surface.extend_stroke(point);
        self.handle_surface_event(event, now);
    }

    pub fn pointer_up(&mut self, now: Instant) {
        let event = self.surface.end_stroke();
        self.handle_surface_event(event, now);
    }

    /// Leaving the surface mid-stroke closes it the same way a release does.
    pub fn pointer_leave(&mut self, now: Instant) {
        self.pointer_up(now);
    }

    pub fn set_brush_width(&mut self, width: u32) {
        self.surface.set_brush_width(width);
    }

    pub fn clear(&mut self) {
        let event = self.surface.clear();
        self.handle_surface_event(event, Instant::now());
    }

    /// Fires a due submission and applies any responses that have arrived.
    pub fn tick(&mut self, now: Instant) -> Vec<OutcomeDisposition> {
        let _ = self.trigger.tick(now, self.surface.raster());
        self.trigger.pump()
    }

    pub fn settle(&mut self, timeout: Duration) -> Vec<OutcomeDisposition> {
        self.trigger.settle(timeout)
    }

    /// Time until the pending submission fires, if one is scheduled.
    pub fn next_deadline_in(&self, now: Instant) -> Option<Duration> {
        self.trigger.time_until_due(now)
    }

    fn handle_surface_event(&mut self, event: Option<SurfaceEvent>, now: Instant) {
        match event {
            Some(SurfaceEvent::ContentsChanged) => self.trigger.schedule_submission(now),
            Some(SurfaceEvent::Cleared) => {
                if self.trigger.cancel_pending() {
                    tracing::debug!("pending submission cancelled by clear");
                }
                self.trigger.reset_prediction();
            }
            None => {}
        }
    }
}
