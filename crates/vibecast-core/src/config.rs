use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable for the forecast provider API key.
pub const FORECAST_KEY_ENV: &str = "VIBECAST_FORECAST_API_KEY";
/// Environment variable for the text-generation provider API key.
pub const SUMMARY_KEY_ENV: &str = "VIBECAST_SUMMARY_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Forecast provider settings
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Summary generation settings
    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Base URL of the forecast provider
    pub base_url: String,

    /// API key (optional in the file, can be set via environment)
    pub api_key: Option<String>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pirateweather.net".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Base URL of the chat-completions provider
    pub base_url: String,

    /// API key (optional in the file, can be set via environment)
    pub api_key: Option<String>,

    /// Model identifier sent with each request
    pub model: String,

    /// Completion token ceiling
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vibecast");

        Self {
            config_dir,
            forecast: ForecastConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating a default one if it doesn't exist.
    ///
    /// API keys from the environment override whatever the file holds. A
    /// missing key is not an error here; it surfaces when the owning client
    /// is first asked to perform a request.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Overlay secrets from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(FORECAST_KEY_ENV) {
            if !key.is_empty() {
                self.forecast.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var(SUMMARY_KEY_ENV) {
            if !key.is_empty() {
                self.summary.api_key = Some(key);
            }
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Directory used for file-backed preference storage.
    pub fn store_dir(&self) -> PathBuf {
        self.config_dir.join("store")
    }

    /// Validate URL-shaped fields; key absence is reported as a warning only.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("forecast.base_url", &self.forecast.base_url),
            ("summary.base_url", &self.summary.base_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got: {}",
                    field, value
                )));
            }
        }

        if self.forecast.api_key.is_none() {
            tracing::warn!(
                "No forecast API key configured; set {} to enable fetching",
                FORECAST_KEY_ENV
            );
        }
        if self.summary.api_key.is_none() {
            tracing::warn!(
                "No summary API key configured; set {} to enable AI summaries",
                SUMMARY_KEY_ENV
            );
        }

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("vibecast");

        Ok(config_dir.join("config.toml"))
    }
}
