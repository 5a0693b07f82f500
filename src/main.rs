use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;

use vibecast_core::Config;
use vibecast_forecast::{ForecastClient, Timeframe};
use vibecast_locations::{
    JsonFileStore, NominatimGeocoder, PreferenceStore, UnavailablePositioner,
};
use vibecast_session::{SessionEvent, SessionTiming, WeatherSession};
use vibecast_summary::SummaryClient;

#[tokio::main]
async fn main() -> Result<()> {
    vibecast_core::init()?;

    let config = Config::load()?;
    config.validate()?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let prefs = PreferenceStore::new(Arc::new(JsonFileStore::new(&config.store_dir())));
    let forecast_client =
        ForecastClient::new(&config.forecast.base_url, config.forecast.api_key.clone())?;
    let summary_client = SummaryClient::new(
        &config.summary.base_url,
        config.summary.api_key.clone(),
        &config.summary.model,
        config.summary.max_tokens,
        f64::from(config.summary.temperature),
    )?;
    let geocoder = Arc::new(NominatimGeocoder::new()?);

    let (mut session, mut rx) = WeatherSession::new(
        prefs,
        forecast_client,
        summary_client,
        geocoder,
        Arc::new(UnavailablePositioner),
        SessionTiming::default(),
    );

    session.initialize().await;
    settle(&mut session, &mut rx, Duration::from_secs(2)).await;

    if session.selected_location().is_none() {
        println!("No location selected. Add one with a zipcode or city name.");
        return Ok(());
    }

    for timeframe in Timeframe::ALL {
        session.set_timeframe(timeframe);
        settle(&mut session, &mut rx, Duration::from_secs(2)).await;

        let view = session.view_model();
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    Ok(())
}

/// Drain session events until no new one arrives within `idle`.
async fn settle(
    session: &mut WeatherSession,
    rx: &mut UnboundedReceiver<SessionEvent>,
    idle: Duration,
) {
    while let Ok(Some(event)) = tokio::time::timeout(idle, rx.recv()).await {
        session.handle_event(event);
    }
}
