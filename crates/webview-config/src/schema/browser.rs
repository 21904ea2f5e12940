//! Browser engine flags (optional native capability).

use serde::{Deserialize, Serialize};

/// Flags forwarded to `webview_set_browser_flags` when the loaded library
/// provides it. Older builds lack the entry point; the flags are then ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub enable_autoplay: bool,
    pub mute_autoplay: bool,
    /// Raw engine switches, e.g. `--autoplay-policy=no-user-gesture-required`.
    pub custom_flags: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enable_autoplay: false,
            mute_autoplay: true,
            custom_flags: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// The single space-separated string the native side expects.
    pub fn joined_flags(&self) -> String {
        self.custom_flags.join(" ")
    }
}
