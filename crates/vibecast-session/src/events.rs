//! Events feeding back into the session's single consumer.
//!
//! Background work (forecast fetches, summary generation, debounce timers,
//! search) never mutates session state directly; it sends one of these and
//! the owner applies it through `WeatherSession::handle_event`. Every event
//! carries enough identity (location id, epoch, sequence) for stale results
//! to be dropped on arrival.

use vibecast_forecast::{ForecastError, ForecastPayload, Timeframe};
use vibecast_locations::SearchEvent;
use vibecast_summary::{Personality, SummaryError};

/// Coordinate identity of a forecast fetch, at micro-degree precision.
/// A re-selection of the same coordinates maps to the same key, so the
/// fetch can be skipped when data is already in hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchKey {
    lat_micro: i64,
    lon_micro: i64,
}

impl FetchKey {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_micro: (latitude * 1e6).round() as i64,
            lon_micro: (longitude * 1e6).round() as i64,
        }
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    /// A forecast fetch resolved. `location_id` is checked against the
    /// current selection before the result is committed.
    ForecastFetched {
        location_id: String,
        key: FetchKey,
        result: Result<ForecastPayload, ForecastError>,
    },

    /// The post-change summary debounce elapsed. Stale epochs are ignored.
    SummaryDebounceElapsed { epoch: u64 },

    /// A summary generation call resolved.
    SummaryDone {
        timeframe: Timeframe,
        personality: Personality,
        epoch: u64,
        result: Result<String, SummaryError>,
    },

    /// The personality-transition hard cap elapsed.
    TransitionExpired { epoch: u64 },

    /// A debounced location-search outcome.
    Search(SearchEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_keys_match_at_micro_degree_precision() {
        let a = FetchKey::new(47.6000001, -122.3);
        let b = FetchKey::new(47.6000001, -122.3);
        let c = FetchKey::new(47.61, -122.3);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn sub_micro_degree_jitter_is_the_same_key() {
        let a = FetchKey::new(47.6, -122.3);
        let b = FetchKey::new(47.6000000004, -122.3000000004);
        assert_eq!(a, b);
    }
}
