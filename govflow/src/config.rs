//! Configuration types for the engine and logging.

use crate::errors::GovflowError;
use serde::{Deserialize, Serialize};

/// Configuration for a [`GovernanceEngine`](crate::pipeline::GovernanceEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name used in logs and events.
    #[serde(default = "default_name")]
    pub name: String,
    /// Whether completed runs are appended to the in-memory history.
    #[serde(default = "default_retain_history")]
    pub retain_history: bool,
    /// Whether to install a [`LoggingEventSink`](crate::events::LoggingEventSink)
    /// when no sink is supplied.
    #[serde(default)]
    pub log_events: bool,
}

fn default_name() -> String {
    "governance".to_string()
}

const fn default_retain_history() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            retain_history: default_retain_history(),
            log_events: false,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables or disables history retention.
    #[must_use]
    pub const fn with_retain_history(mut self, retain: bool) -> Self {
        self.retain_history = retain;
        self
    }

    /// Enables or disables event logging.
    #[must_use]
    pub const fn with_log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GovflowError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration consumed by [`init_logging`](crate::observability::init_logging).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `govflow=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}
