//! System configuration types: dispatch runtime and logging.

use serde::{Deserialize, Serialize};

/// Settings for the runtime that executes bound host functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Worker threads of the runtime the context creates when the caller is
    /// not already inside one (valid range: 1-64).
    pub worker_threads: u32,
    /// Sleep between pump steps in `run_pumped`, in milliseconds (1-1000).
    pub pump_interval_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            pump_interval_ms: 16,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_config_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.worker_threads, 2);
        assert_eq!(config.pump_interval_ms, 16);
    }

    #[test]
    fn log_level_serialization() {
        let json = serde_json::to_string(&LogLevel::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
        let parsed: LogLevel = serde_json::from_str("\"DEBUG\"").unwrap();
        assert_eq!(parsed, LogLevel::Debug);
    }

    #[test]
    fn log_level_directives() {
        assert_eq!(LogLevel::Warning.as_directive(), "warn");
        assert_eq!(LogLevel::default().as_directive(), "info");
    }
}
