use serde_json::Value;
use tracing::{debug, warn};
use webview_common::InvocationError;
use webview_sys::{encode_failure, encode_json};

use crate::registry::LiveHandle;

/// Hand the outcome of request `request_id` back to the native engine.
///
/// A window destroyed in the meantime makes this a no-op.
pub(crate) fn deliver_result(
    live: &LiveHandle,
    request_id: &str,
    outcome: Result<Value, InvocationError>,
) {
    let (success, payload) = match outcome.and_then(|value| encode_json(&value)) {
        Ok(json) => (true, json),
        Err(err) => {
            warn!(window = %live.id(), request_id, error = %err, "invocation failed");
            (false, encode_failure(&err))
        }
    };

    let delivered = live.with(|table, handle| {
        // SAFETY: `with` holds the handle open for the duration of the call.
        unsafe { table.return_result(handle, request_id, success, &payload) }
    });

    match delivered {
        Ok(()) => debug!(window = %live.id(), request_id, success, "result delivered"),
        Err(_) => debug!(
            window = %live.id(),
            request_id,
            "window destroyed before result delivery, dropping result"
        ),
    }
}
