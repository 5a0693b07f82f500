//! HTTP client for the forecast provider.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::instrument;

use crate::types::ForecastPayload;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Forecast API key is not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Forecast API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl ForecastError {
    /// User-friendly, retry-able message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::MissingApiKey => {
                "Forecast API key is missing. Check your settings.".to_string()
            }
            ForecastError::Network(_) => {
                "Failed to fetch weather data. Please try again.".to_string()
            }
            ForecastError::Api { status, .. } if *status >= 500 => {
                "The weather service is having trouble. Please try again later.".to_string()
            }
            ForecastError::Api { .. } => {
                "Failed to fetch weather data. Please try again.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ForecastClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ForecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetch the forecast for a coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastPayload, ForecastError> {
        let api_key = self.api_key.as_deref().ok_or(ForecastError::MissingApiKey)?;

        let url = format!(
            "{}/forecast/{}/{},{}?exclude=hrrr",
            self.base_url, api_key, latitude, longitude
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ForecastError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: ForecastPayload = response.json().await?;
        tracing::info!(
            hourly = payload.hourly.data.len(),
            daily = payload.daily.data.len(),
            "Forecast fetched"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_surfaces_at_first_use() {
        let client = ForecastClient::new("https://example.invalid", None).unwrap();
        let err = client.fetch(37.0, -122.0).await.unwrap_err();
        assert!(matches!(err, ForecastError::MissingApiKey));
        assert!(err.user_message().contains("API key"));
    }
}
