//! Full configuration validation.
//!
//! Validates numeric ranges and mutually exclusive fields. Each section has
//! its own submodule; this orchestrator calls them all and collects errors
//! into a single `ConfigError`.

mod bridge;
mod helpers;
mod window;

#[cfg(test)]
mod tests;

use crate::schema::WebviewConfig;
use webview_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WebviewConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    window::validate_window(&mut errors, config);
    window::validate_content(&mut errors, config);
    bridge::validate_bridge(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
