//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod browser;
mod library;
mod system;
mod window;

pub use browser::*;
pub use library::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct WebviewConfig {
    pub library: LibraryConfig,
    pub window: WindowConfig,
    /// Browser flags applied to every new window. Absent means "leave the
    /// engine defaults alone" and no optional entry point is probed.
    pub browser: Option<BrowserConfig>,
    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}
