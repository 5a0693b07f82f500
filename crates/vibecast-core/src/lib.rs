pub mod config;
pub mod error;
pub mod schedule;

pub use config::{Config, ForecastConfig, SummaryConfig};
pub use error::ConfigError;
pub use schedule::DebounceScheduler;

use anyhow::Result;

/// Initialize tracing for the application.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Vibecast core initialized");
    Ok(())
}
