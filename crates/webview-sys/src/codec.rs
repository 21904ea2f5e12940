//! Text and JSON marshalling across the native boundary.

use std::ffi::{c_char, CStr, CString};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use webview_common::InvocationError;

/// A NUL-terminated copy of a string, valid for as long as the value lives.
///
/// The native side copies every string it receives before returning, so a
/// buffer only has to outlive the single call it is passed to.
pub struct ScopedBuffer(CString);

impl ScopedBuffer {
    pub fn as_ptr(&self) -> *const c_char {
        self.0.as_ptr()
    }

    pub fn as_str(&self) -> &str {
        // Built from a `&str` prefix, so always valid UTF-8.
        self.0.to_str().unwrap_or_default()
    }
}

/// Encode `text` for the native side.
///
/// C strings cannot carry an interior NUL; the text is cut at the first one.
pub fn encode_text(text: &str) -> ScopedBuffer {
    match CString::new(text) {
        Ok(c) => ScopedBuffer(c),
        Err(err) => {
            let cut = err.nul_position();
            warn!(
                position = cut,
                length = text.len(),
                "string contains an interior NUL, truncating"
            );
            let mut bytes = err.into_vec();
            bytes.truncate(cut);
            // No NUL remains after truncating at the first one.
            ScopedBuffer(CString::new(bytes).unwrap_or_default())
        }
    }
}

/// Copy a NUL-terminated string handed over by the native side.
///
/// Invalid UTF-8 is replaced rather than rejected. Returns `None` for null.
///
/// # Safety
/// `ptr` must be null or point at a NUL-terminated buffer that stays valid
/// for the duration of the call.
pub unsafe fn decode_text(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

/// Serialize a host value for `webview_return`.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String, InvocationError> {
    serde_json::to_string(value).map_err(|e| {
        InvocationError::HostFunction(format!("result is not representable as JSON: {e}"))
    })
}

pub fn decode_json<T: DeserializeOwned>(json: &str) -> Result<T, InvocationError> {
    serde_json::from_str(json).map_err(|e| InvocationError::Decode(e.to_string()))
}

/// Parse the argument payload of an invocation.
///
/// The page always sends a JSON array; anything else is a decode failure.
pub fn decode_args(req: &str) -> Result<Vec<Value>, InvocationError> {
    match decode_json::<Value>(req)? {
        Value::Array(args) => Ok(args),
        other => Err(InvocationError::Decode(format!(
            "expected a JSON array of arguments, got {}",
            kind(&other)
        ))),
    }
}

/// The rejection payload for a failed invocation: the message as a JSON string.
pub fn encode_failure(error: &InvocationError) -> String {
    Value::String(error.to_string()).to_string()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
