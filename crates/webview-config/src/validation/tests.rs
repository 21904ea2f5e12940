//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = WebviewConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zero_width() {
    let mut config = WebviewConfig::default();
    config.window.width = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
}

#[test]
fn catches_oversized_height() {
    let mut config = WebviewConfig::default();
    config.window.height = 20_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.height"));
}

#[test]
fn catches_opacity_out_of_range() {
    let mut config = WebviewConfig::default();
    config.window.opacity = 1.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.opacity"));

    config.window.opacity = -0.1;
    assert!(validate(&config).is_err());
}

#[test]
fn catches_nan_opacity() {
    let mut config = WebviewConfig::default();
    config.window.opacity = f64::NAN;
    assert!(validate(&config).is_err());
}

#[test]
fn catches_url_and_html_together() {
    let mut config = WebviewConfig::default();
    config.window.url = Some("https://example.com".into());
    config.window.html = Some("<p>hi</p>".into());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("mutually exclusive"));
}

#[test]
fn catches_zero_worker_threads() {
    let mut config = WebviewConfig::default();
    config.bridge.worker_threads = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bridge.worker_threads"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = WebviewConfig::default();
    config.window.width = 0;
    config.window.opacity = 2.0;
    config.bridge.pump_interval_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
    assert!(err.contains("window.opacity"));
    assert!(err.contains("bridge.pump_interval_ms"));
    assert_eq!(err.matches(';').count(), 2);
}

#[test]
fn boundary_values_are_valid() {
    let mut config = WebviewConfig::default();
    config.window.width = 1;
    config.window.height = 16_384;
    config.window.opacity = 0.0;
    config.bridge.worker_threads = 64;
    assert!(validate(&config).is_ok());
}
