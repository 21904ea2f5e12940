//! Window section validation.

use crate::schema::WebviewConfig;

use super::helpers::{validate_range, validate_range_f64};

const MAX_DIMENSION: u32 = 16_384;

/// Validate size and opacity constraints.
pub(crate) fn validate_window(errors: &mut Vec<String>, config: &WebviewConfig) {
    validate_range(errors, "window.width", config.window.width, 1, MAX_DIMENSION);
    validate_range(errors, "window.height", config.window.height, 1, MAX_DIMENSION);
    validate_range_f64(errors, "window.opacity", config.window.opacity, 0.0, 1.0);
}

/// `url` and `html` cannot both be set.
pub(crate) fn validate_content(errors: &mut Vec<String>, config: &WebviewConfig) {
    if config.window.url.is_some() && config.window.html.is_some() {
        errors.push("window.url and window.html are mutually exclusive".into());
    }
}
