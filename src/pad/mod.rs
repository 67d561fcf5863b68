pub mod capture;
pub mod client;
pub mod controller;
pub mod debounce;
pub mod messages;
pub mod model;
pub mod raster;
pub mod state;
pub mod surface;
pub mod trigger;

pub use client::{HttpPredictClient, PredictClient, SubmitError};
pub use controller::{DigitPad, PadConfig};
pub use surface::{CaptureSurface, SurfaceEvent};
pub use trigger::InferenceTrigger;
