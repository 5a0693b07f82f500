//! Configuration error type shared across the workspace.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// User-friendly message suitable for UI display.
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::ParseError(_) => {
                "Configuration file is malformed. Check your settings.".to_string()
            }
            ConfigError::MissingSetting(key) => {
                format!("Missing setting: {}. Add it to your config or environment.", key)
            }
            ConfigError::Invalid(msg) => format!("Invalid configuration: {}", msg),
        }
    }
}
