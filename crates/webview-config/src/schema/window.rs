//! Window configuration types.

use serde::{Deserialize, Serialize};
use webview_common::SizeHint;

/// Initial window appearance and content.
///
/// Every field maps onto one facade setter; `create_window` applies them in
/// declaration order right after the native handle is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Enables the engine's developer tools.
    pub debug: bool,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub size_hint: SizeHint,
    /// Show the native title bar and border.
    pub frame: bool,
    /// Window-level opacity (valid range: 0.0-1.0).
    pub opacity: f64,
    /// Per-pixel transparency. Ignored by backends that lack it.
    pub pixel_transparency: bool,
    pub always_on_top: bool,
    /// Pass mouse input through transparent regions.
    pub click_through: bool,
    /// Scripts injected before every page load, in order.
    pub init_scripts: Vec<String>,
    /// Initial URL to load (mutually exclusive with `html`).
    pub url: Option<String>,
    /// Initial HTML content to render (mutually exclusive with `url`).
    pub html: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            debug: cfg!(debug_assertions),
            title: "Webview".into(),
            width: 800,
            height: 600,
            size_hint: SizeHint::None,
            frame: true,
            opacity: 1.0,
            pixel_transparency: false,
            always_on_top: false,
            click_through: false,
            init_scripts: Vec::new(),
            url: None,
            html: None,
        }
    }
}

impl WindowConfig {
    /// Create a config that loads a URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create a config that renders inline HTML.
    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Default::default()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_config_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "Webview");
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.size_hint, SizeHint::None);
        assert!(config.frame);
        assert!((config.opacity - 1.0).abs() < f64::EPSILON);
        assert!(!config.pixel_transparency);
        assert!(!config.always_on_top);
        assert!(!config.click_through);
        assert!(config.url.is_none());
        assert!(config.html.is_none());
    }

    #[test]
    fn with_url_and_with_html() {
        let c = WindowConfig::with_url("https://example.com");
        assert_eq!(c.url.as_deref(), Some("https://example.com"));
        assert!(c.html.is_none());

        let c = WindowConfig::with_html("<h1>hi</h1>");
        assert_eq!(c.html.as_deref(), Some("<h1>hi</h1>"));
        assert!(c.url.is_none());
    }

    #[test]
    fn window_config_partial_toml() {
        let toml_str = r#"
title = "Overlay"
width = 500
height = 500
size_hint = "fixed"
frame = false
pixel_transparency = true
opacity = 0.85
"#;
        let config: WindowConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.title, "Overlay");
        assert_eq!(config.width, 500);
        assert_eq!(config.size_hint, SizeHint::Fixed);
        assert!(!config.frame);
        assert!(config.pixel_transparency);
        assert!((config.opacity - 0.85).abs() < f64::EPSILON);
        // Defaults preserved
        assert!(!config.always_on_top);
        assert!(config.init_scripts.is_empty());
    }
}
