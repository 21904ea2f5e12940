//! Bridge runtime validation.

use crate::schema::WebviewConfig;

use super::helpers::validate_range;

pub(crate) fn validate_bridge(errors: &mut Vec<String>, config: &WebviewConfig) {
    validate_range(
        errors,
        "bridge.worker_threads",
        config.bridge.worker_threads,
        1,
        64,
    );
    validate_range(
        errors,
        "bridge.pump_interval_ms",
        config.bridge.pump_interval_ms,
        1,
        1000,
    );
}
