use digit_pad::settings::{BackendTarget, Settings, DEVELOPMENT_BACKEND_URL};
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn save_then_load_preserves_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();

    let settings = Settings {
        backend: BackendTarget::Development,
        debounce_ms: 150,
        brush_width: 20,
        discard_stale_responses: true,
        log_file: Some(dir.path().join("pad.log")),
        ..Settings::default()
    };
    settings.save(path).unwrap();

    let loaded = Settings::load(path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.backend_url(), DEVELOPMENT_BACKEND_URL);
    assert_eq!(loaded.pad_config().quiet_period, Duration::from_millis(150));
}

#[test]
fn partial_file_fills_missing_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "backend_url": "http://10.0.0.5:5050" }"#).unwrap();

    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.backend_url(), "http://10.0.0.5:5050");
    assert_eq!(settings.debounce_ms, 300);
    assert_eq!(settings.request_timeout(), Duration::from_secs(30));
}

#[test]
fn invalid_json_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load(path.to_str().unwrap()).is_err());
}
