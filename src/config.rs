//! Machine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse machine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables of a state machine.
///
/// Every field has a default, so a configuration file only needs the
/// fields it changes.
///
/// # Example
///
/// ```rust
/// use stance::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "history_capacity": 4 }"#).unwrap();
/// assert_eq!(config.history_capacity, 4);
/// assert!(!config.trace_ticks);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Number of recent state changes kept in the transition log (0 disables it)
    pub history_capacity: usize,

    /// Emit a trace event for every tick and every `update` hook call
    pub trace_ticks: bool,
}

impl MachineConfig {
    pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn trace_ticks(mut self, enabled: bool) -> Self {
        self.trace_ticks = enabled;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            history_capacity: Self::DEFAULT_HISTORY_CAPACITY,
            trace_ticks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let config = MachineConfig::from_json("{}").unwrap();
        assert_eq!(config, MachineConfig::default());
        assert_eq!(config.history_capacity, MachineConfig::DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn json_overrides_fields() {
        let config =
            MachineConfig::from_json(r#"{ "history_capacity": 0, "trace_ticks": true }"#).unwrap();
        assert_eq!(config.history_capacity, 0);
        assert!(config.trace_ticks);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let result = MachineConfig::from_json(r#"{ "history_capacity": "many" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = MachineConfig::default().history_capacity(2).trace_ticks(true);
        assert_eq!(config.history_capacity, 2);
        assert!(config.trace_ticks);
    }
}
