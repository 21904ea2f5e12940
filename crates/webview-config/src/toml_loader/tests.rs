//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;
use webview_common::{ConfigError, SizeHint};

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_webview_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webview.toml");
    std::fs::write(
        &path,
        r#"
[window]
title = "Bun App"
size_hint = "fixed"

[browser]
enable_autoplay = true
custom_flags = ["--autoplay-policy=no-user-gesture-required"]
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Bun App");
    assert_eq!(config.window.size_hint, SizeHint::Fixed);
    let browser = config.browser.unwrap();
    assert!(browser.enable_autoplay);
    assert_eq!(browser.custom_flags.len(), 1);
    // Defaults preserved
    assert_eq!(config.window.width, 800);
    assert_eq!(config.bridge.worker_threads, 2);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webview.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_still_returns_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webview.toml");
    std::fs::write(
        &path,
        r#"
[window]
opacity = 3.5
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert!((config.window.opacity - 3.5).abs() < f64::EPSILON);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webview").join("webview.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Webview");
    assert!(config.browser.is_none());
    assert!(config.library.use_env_override);
}

#[test]
fn default_config_path_ends_with_webview_toml() {
    let path = default_config_path().unwrap();
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), "webview.toml");
    assert!(path.parent().unwrap().ends_with("webview"));
}
