use std::path::PathBuf;

use crate::types::WindowId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the native library itself: loading, symbol resolution,
/// optional capabilities and instance creation.
#[derive(Debug, thiserror::Error)]
pub enum NativeError {
    #[error("failed to load native library {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("native library is missing required entry points: {}", .missing.join(", "))]
    Symbol { missing: Vec<String> },

    #[error("optional entry point not supported by this native library: {0}")]
    Unsupported(&'static str),

    #[error("native engine returned a null handle")]
    CreateFailed,
}

/// Per-request failures of the callback bridge. Each one is delivered back to
/// the calling page as a rejected promise and never escapes the bridge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("{0}")]
    HostFunction(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot unload native library: {remaining} window(s) still registered")]
pub struct ShutdownError {
    pub remaining: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Native(#[from] NativeError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Shutdown(#[from] ShutdownError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0} has been destroyed")]
    WindowDestroyed(WindowId),

    #[error("native library has already been unloaded")]
    Unloaded,
}
