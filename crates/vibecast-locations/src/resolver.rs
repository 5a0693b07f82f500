//! Debounced free-text location search and manual add.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use vibecast_core::DebounceScheduler;

use crate::geocode::{GeocodeError, Geocoder};
use crate::types::{Location, SearchResult};

/// Keystroke debounce for free-text search.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
/// Maximum geocode candidates resolved per search.
pub const MAX_CANDIDATES: usize = 5;
/// Queries shorter than this (after trimming) clear results without querying.
pub const MIN_QUERY_LEN: usize = 3;

const SEARCH_TASK_KEY: &str = "location-search";

/// Search outcomes delivered to the owner.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// A completed search. `seq` lets the consumer discard stale sets.
    Results { seq: u64, results: Vec<SearchResult> },
    /// The query dropped below the minimum length; results should empty.
    Cleared,
}

type SearchSink = Arc<dyn Fn(SearchEvent) + Send + Sync>;

#[derive(Debug, Error)]
pub enum AddLocationError {
    #[error("Location input is empty")]
    EmptyInput,

    #[error("No matching location found")]
    NotFound,

    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),
}

impl AddLocationError {
    /// Validation message for the add-location form.
    pub fn user_message(&self) -> &'static str {
        match self {
            AddLocationError::EmptyInput => {
                "Please enter a location (zipcode, city, or city, state)."
            }
            AddLocationError::NotFound | AddLocationError::Geocode(_) => {
                "Could not find this location. Please try a different search term."
            }
        }
    }
}

pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    scheduler: DebounceScheduler,
    debounce: Duration,
    seq: Arc<AtomicU64>,
    sink: SearchSink,
}

impl LocationResolver {
    pub fn new<F>(geocoder: Arc<dyn Geocoder>, sink: F) -> Self
    where
        F: Fn(SearchEvent) + Send + Sync + 'static,
    {
        Self {
            geocoder,
            scheduler: DebounceScheduler::new(),
            debounce: SEARCH_DEBOUNCE,
            seq: Arc::new(AtomicU64::new(0)),
            sink: Arc::new(sink),
        }
    }

    /// Override the debounce interval (tests).
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Feed one input-change event. Schedules a debounced search, replacing
    /// any pending one; short queries clear results immediately.
    pub fn on_input(&self, text: &str) {
        let query = text.trim().to_string();
        // Bumping the sequence invalidates any in-flight search.
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        if query.chars().count() < MIN_QUERY_LEN {
            self.scheduler.cancel(SEARCH_TASK_KEY);
            (self.sink)(SearchEvent::Cleared);
            return;
        }

        let geocoder = Arc::clone(&self.geocoder);
        let latest = Arc::clone(&self.seq);
        let sink = Arc::clone(&self.sink);
        self.scheduler.schedule(SEARCH_TASK_KEY, self.debounce, move || {
            tokio::spawn(run_search(geocoder, query, seq, latest, sink));
        });
    }

    /// Geocode the full trimmed input into exactly one new saved location.
    pub async fn add_manual(&self, input: &str) -> Result<Location, AddLocationError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(AddLocationError::EmptyInput);
        }

        let candidates = self.geocoder.resolve_text(query).await?;
        let Some(coords) = candidates.first() else {
            return Err(AddLocationError::NotFound);
        };

        let (name, zipcode) = match self
            .geocoder
            .resolve_coordinates(coords.latitude, coords.longitude)
            .await
        {
            Ok(address) => {
                let name = address.display_name(query);
                let zipcode = address.postal_code.unwrap_or_else(|| query.to_string());
                (name, zipcode)
            }
            Err(e) => {
                tracing::debug!("Reverse geocode during add failed: {}", e);
                (query.to_string(), query.to_string())
            }
        };

        Ok(Location::saved(&name, &zipcode, coords.latitude, coords.longitude))
    }

    /// Cancel any pending search and invalidate in-flight results.
    pub fn clear(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        self.scheduler.cancel(SEARCH_TASK_KEY);
        (self.sink)(SearchEvent::Cleared);
    }
}

impl Drop for LocationResolver {
    fn drop(&mut self) {
        self.scheduler.shutdown();
    }
}

async fn run_search(
    geocoder: Arc<dyn Geocoder>,
    query: String,
    seq: u64,
    latest: Arc<AtomicU64>,
    sink: SearchSink,
) {
    let candidates = match geocoder.resolve_text(&query).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!("Location search failed: {}", e);
            Vec::new()
        }
    };

    let mut results = Vec::new();
    for (i, coords) in candidates.iter().take(MAX_CANDIDATES).enumerate() {
        let (name, zipcode) = match geocoder
            .resolve_coordinates(coords.latitude, coords.longitude)
            .await
        {
            Ok(address) => {
                let name = address.display_name(&query);
                let zipcode = address
                    .postal_code
                    .unwrap_or_else(|| "N/A".to_string());
                (name, zipcode)
            }
            Err(_) => (query.clone(), "N/A".to_string()),
        };

        results.push(SearchResult {
            id: format!("search-{}", i),
            name,
            zipcode,
            latitude: coords.latitude,
            longitude: coords.longitude,
        });
    }

    // A newer keystroke superseded this search while it ran.
    if latest.load(Ordering::SeqCst) != seq {
        tracing::debug!(seq, "Discarding stale search results");
        return;
    }

    sink(SearchEvent::Results { seq, results });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{Address, Coordinates};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    struct ScriptedGeocoder {
        candidates: Vec<Coordinates>,
        reverse_fails: bool,
        text_calls: AtomicUsize,
    }

    impl ScriptedGeocoder {
        fn new(count: usize, reverse_fails: bool) -> Self {
            Self {
                candidates: (0..count)
                    .map(|i| Coordinates {
                        latitude: 40.0 + i as f64,
                        longitude: -70.0 - i as f64,
                    })
                    .collect(),
                reverse_fails,
                text_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for ScriptedGeocoder {
        async fn resolve_text(&self, _query: &str) -> Result<Vec<Coordinates>, GeocodeError> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }

        async fn resolve_coordinates(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Address, GeocodeError> {
            if self.reverse_fails {
                return Err(GeocodeError::NotFound);
            }
            Ok(Address {
                city: Some("Portland".to_string()),
                region: Some("Maine".to_string()),
                postal_code: Some("04101".to_string()),
                ..Address::default()
            })
        }
    }

    fn collecting_sink() -> (Arc<Mutex<Vec<SearchEvent>>>, impl Fn(SearchEvent) + Send + Sync) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink_events = Arc::clone(&events);
        (events, move |ev| sink_events.lock().push(ev))
    }

    #[tokio::test]
    async fn short_query_never_geocodes() {
        let geocoder = Arc::new(ScriptedGeocoder::new(3, false));
        let (events, sink) = collecting_sink();
        let resolver = LocationResolver::new(geocoder.clone() as Arc<dyn Geocoder>, sink)
            .with_debounce(Duration::from_millis(10));

        resolver.on_input("ab");
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(geocoder.text_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(events.lock()[0], SearchEvent::Cleared));
    }

    #[tokio::test]
    async fn keystroke_burst_triggers_one_geocode_call() {
        let geocoder = Arc::new(ScriptedGeocoder::new(2, false));
        let (events, sink) = collecting_sink();
        let resolver = LocationResolver::new(geocoder.clone() as Arc<dyn Geocoder>, sink)
            .with_debounce(Duration::from_millis(30));

        resolver.on_input("sea");
        resolver.on_input("seat");
        resolver.on_input("seatt");
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(geocoder.text_calls.load(Ordering::SeqCst), 1);
        let events = events.lock();
        assert_eq!(events.len(), 1);
        match &events[0] {
            SearchEvent::Results { results, .. } => {
                assert_eq!(results.len(), 2);
                assert_eq!(results[0].name, "Portland, Maine");
                assert_eq!(results[0].zipcode, "04101");
                assert_eq!(results[0].id, "search-0");
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn candidates_are_capped_at_five() {
        let geocoder = Arc::new(ScriptedGeocoder::new(8, false));
        let (events, sink) = collecting_sink();
        let resolver = LocationResolver::new(geocoder as Arc<dyn Geocoder>, sink)
            .with_debounce(Duration::from_millis(10));

        resolver.on_input("boston");
        tokio::time::sleep(Duration::from_millis(100)).await;

        match &events.lock()[0] {
            SearchEvent::Results { results, .. } => assert_eq!(results.len(), MAX_CANDIDATES),
            other => panic!("expected results, got {other:?}"),
        };
    }

    #[tokio::test]
    async fn reverse_failure_falls_back_to_query_text() {
        let geocoder = Arc::new(ScriptedGeocoder::new(1, true));
        let (events, sink) = collecting_sink();
        let resolver = LocationResolver::new(geocoder as Arc<dyn Geocoder>, sink)
            .with_debounce(Duration::from_millis(10));

        resolver.on_input("springfield");
        tokio::time::sleep(Duration::from_millis(100)).await;

        match &events.lock()[0] {
            SearchEvent::Results { results, .. } => {
                assert_eq!(results[0].name, "springfield");
                assert_eq!(results[0].zipcode, "N/A");
            }
            other => panic!("expected results, got {other:?}"),
        };
    }

    #[tokio::test]
    async fn add_manual_validates_input() {
        let geocoder = Arc::new(ScriptedGeocoder::new(1, false));
        let (_, sink) = collecting_sink();
        let resolver = LocationResolver::new(geocoder as Arc<dyn Geocoder>, sink);

        let err = resolver.add_manual("   ").await.unwrap_err();
        assert!(matches!(err, AddLocationError::EmptyInput));
        assert!(err.user_message().contains("enter a location"));
    }

    #[tokio::test]
    async fn add_manual_reports_not_found() {
        let geocoder = Arc::new(ScriptedGeocoder::new(0, false));
        let (_, sink) = collecting_sink();
        let resolver = LocationResolver::new(geocoder as Arc<dyn Geocoder>, sink);

        let err = resolver.add_manual("nowhere").await.unwrap_err();
        assert!(matches!(err, AddLocationError::NotFound));
    }

    #[tokio::test]
    async fn add_manual_builds_a_saved_location() {
        let geocoder = Arc::new(ScriptedGeocoder::new(1, false));
        let (_, sink) = collecting_sink();
        let resolver = LocationResolver::new(geocoder as Arc<dyn Geocoder>, sink);

        let loc = resolver.add_manual(" Portland, ME ").await.unwrap();
        assert_eq!(loc.name, "Portland, Maine");
        assert_eq!(loc.zipcode.as_deref(), Some("04101"));
        assert_eq!(loc.kind, crate::types::LocationKind::Zipcode);
    }
}
