//! Native library location settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to find the native webview library.
///
/// Precedence: `path`, then the `WEBVIEW_PATH` environment variable (when
/// `use_env_override` is set), then the platform default file name in each
/// of `search_dirs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub path: Option<PathBuf>,
    pub use_env_override: bool,
    pub search_dirs: Vec<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: None,
            use_env_override: true,
            search_dirs: Vec::new(),
        }
    }
}
