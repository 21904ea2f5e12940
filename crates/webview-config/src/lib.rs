//! Configuration for the webview bridge.
//!
//! Provides TOML-based configuration for locating the native library,
//! default window appearance, optional browser flags, and the dispatch
//! runtime. All sections use defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use webview_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config.window.title);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BridgeConfig, BrowserConfig, LibraryConfig, LogLevel, LoggingConfig, WebviewConfig,
    WindowConfig, CONFIG_SCHEMA_VERSION,
};

use webview_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<WebviewConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
