use crate::pad::controller::PadConfig;
use crate::pad::messages::StalePolicy;
use crate::pad::model::{clamp_brush_width, DEFAULT_BRUSH_WIDTH, SURFACE_HEIGHT, SURFACE_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEVELOPMENT_BACKEND_URL: &str = "http://localhost:5050";
pub const PRODUCTION_BACKEND_URL: &str = "https://digit-predictor-jy2a.onrender.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendTarget {
    Development,
    Production,
}

impl Default for BackendTarget {
    fn default() -> Self {
        BackendTarget::Production
    }
}

impl std::fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendTarget::Development => write!(f, "development"),
            BackendTarget::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Which built-in classifier deployment to talk to.
    #[serde(default)]
    pub backend: BackendTarget,
    /// Explicit base URL. Takes precedence over `backend` when set.
    #[serde(default)]
    pub backend_url: Option<String>,
    /// Quiet period in milliseconds before a drawing is submitted.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Initial brush width, clamped to the slider range.
    #[serde(default = "default_brush_width")]
    pub brush_width: u32,
    /// When enabled, a response to an older request never replaces the
    /// prediction of a newer one.
    #[serde(default)]
    pub discard_stale_responses: bool,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file that receives a copy of the log output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_brush_width() -> u32 {
    DEFAULT_BRUSH_WIDTH
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendTarget::default(),
            backend_url: None,
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            brush_width: default_brush_width(),
            discard_stale_responses: false,
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn backend_url(&self) -> String {
        if let Some(url) = self.backend_url.as_deref().map(str::trim) {
            if !url.is_empty() {
                return url.to_string();
            }
            tracing::warn!("configured backend_url is empty; using {} backend", self.backend);
        }
        match self.backend {
            BackendTarget::Development => DEVELOPMENT_BACKEND_URL.to_string(),
            BackendTarget::Production => PRODUCTION_BACKEND_URL.to_string(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn pad_config(&self) -> PadConfig {
        PadConfig {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            brush_width: clamp_brush_width(self.brush_width),
            quiet_period: Duration::from_millis(self.debounce_ms),
            stale_policy: StalePolicy::from_flag(self.discard_stale_responses),
        }
    }
}
