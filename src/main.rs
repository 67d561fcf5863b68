use digit_pad::gui::DigitPadApp;
use digit_pad::logging;
use digit_pad::pad::{DigitPad, HttpPredictClient};
use digit_pad::settings::Settings;

use eframe::egui;
use std::sync::Arc;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging, settings.log_file.clone());

    let backend_url = settings.backend_url();
    tracing::info!(backend = %backend_url, "starting digit pad");
    let client = HttpPredictClient::new(&backend_url, settings.request_timeout())?;
    tracing::debug!(endpoint = client.endpoint(), "classifier client ready");
    let pad = DigitPad::new(settings.pad_config(), Arc::new(client));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([460.0, 540.0])
            .with_min_inner_size([320.0, 440.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Digit Doodle Pad",
        native_options,
        Box::new(move |_cc| Box::new(DigitPadApp::new(pad))),
    )
    .map_err(|err| anyhow::anyhow!("window failed: {err}"))
}
