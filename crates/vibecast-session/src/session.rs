//! The orchestrator: selected location, timeframe, personality, metric,
//! forecast state, summary cache, and the event loop that ties them together.
//!
//! All mutation happens through `&mut self`; spawned work reports back via
//! `SessionEvent`s consumed by `handle_event`, so there is exactly one
//! writer and stale results are filtered at the commit point.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use vibecast_core::DebounceScheduler;
use vibecast_forecast::{
    derive_window, metric_catalog, metric_series, ForecastClient, ForecastPayload, MetricId,
    MetricPoint, MetricSpec, Timeframe,
};
use vibecast_locations::{
    fetch_current_location, AddLocationError, DevicePositioner, Geocoder, Location, LocationKind,
    LocationResolver, PreferenceStore, SearchEvent, SearchResult,
};
use vibecast_summary::{
    build_messages, fallback_text, Personality, SummaryCache, SummaryClient, SummaryState,
};

use crate::events::{FetchKey, SessionEvent};
use crate::view::{MetricOption, SessionView, SummaryDisplay};

const SUMMARY_DEBOUNCE_KEY: &str = "summary-debounce";
const TRANSITION_KEY: &str = "personality-transition";

/// Timer intervals, overridable in tests.
#[derive(Debug, Clone, Copy)]
pub struct SessionTiming {
    /// Delay between a forecast/timeframe/personality change and the
    /// summary request it triggers.
    pub summary_debounce: Duration,
    /// Keystroke debounce for location search.
    pub search_debounce: Duration,
    /// Hard cap on the personality-transition period.
    pub transition_cap: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            summary_debounce: Duration::from_millis(50),
            search_debounce: Duration::from_millis(500),
            transition_cap: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum ForecastState {
    #[default]
    Idle,
    Loading,
    Ready(ForecastPayload),
    Error(String),
}

pub struct WeatherSession {
    prefs: PreferenceStore,
    forecast_client: ForecastClient,
    summary_client: SummaryClient,
    geocoder: Arc<dyn Geocoder>,
    positioner: Arc<dyn DevicePositioner>,
    resolver: LocationResolver,
    scheduler: DebounceScheduler,
    timing: SessionTiming,
    tx: UnboundedSender<SessionEvent>,

    saved: Vec<Location>,
    selected: Option<Location>,
    personality: Personality,
    timeframe: Timeframe,
    metric: MetricId,

    forecast: ForecastState,
    last_fetch_key: Option<FetchKey>,
    forecast_generation: u64,
    summaries: SummaryCache,
    timeline_memo: Option<((u64, Timeframe, MetricId), Vec<MetricPoint>)>,

    in_transition: bool,
    transition_epoch: u64,

    search_results: Vec<SearchResult>,
    search_seq: u64,
}

impl WeatherSession {
    /// Build a session and the event receiver its owner must drain into
    /// `handle_event`.
    pub fn new(
        prefs: PreferenceStore,
        forecast_client: ForecastClient,
        summary_client: SummaryClient,
        geocoder: Arc<dyn Geocoder>,
        positioner: Arc<dyn DevicePositioner>,
        timing: SessionTiming,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let search_tx = tx.clone();
        let resolver = LocationResolver::new(Arc::clone(&geocoder), move |event| {
            let _ = search_tx.send(SessionEvent::Search(event));
        })
        .with_debounce(timing.search_debounce);

        let session = Self {
            prefs,
            forecast_client,
            summary_client,
            geocoder,
            positioner,
            resolver,
            scheduler: DebounceScheduler::new(),
            timing,
            tx,
            saved: Vec::new(),
            selected: None,
            personality: Personality::Default,
            timeframe: Timeframe::Now,
            metric: MetricId::Temperature,
            forecast: ForecastState::Idle,
            last_fetch_key: None,
            forecast_generation: 0,
            summaries: SummaryCache::new(),
            timeline_memo: None,
            in_transition: false,
            transition_epoch: 0,
            search_results: Vec::new(),
            search_seq: 0,
        };
        (session, rx)
    }

    /// Seed state from persistence: personality, saved list, and the last
    /// selection. A persisted zipcode location wins; otherwise the device
    /// position is tried, and failing that the session stays unselected.
    pub async fn initialize(&mut self) {
        self.personality = Personality::parse(&self.prefs.load_personality());
        self.saved = self.prefs.load_locations();

        if let Some(last) = self.prefs.load_last_selected() {
            if last.kind == LocationKind::Zipcode {
                self.select_location(last);
                return;
            }
        }

        match fetch_current_location(self.positioner.as_ref(), self.geocoder.as_ref()).await {
            Ok(location) => self.select_location(location),
            Err(e) => {
                tracing::warn!("No location selected at startup: {}", e.user_message());
            }
        }
    }

    /// Select a location: persist it as last-selected, append brand-new
    /// saved locations to the list, and fetch its forecast.
    pub fn select_location(&mut self, location: Location) {
        self.prefs.save_last_selected(&location);

        if location.kind == LocationKind::Zipcode
            && !self.saved.iter().any(|l| l.id == location.id)
        {
            self.saved.push(location.clone());
            self.prefs.save_locations(&self.saved);
        }

        tracing::info!(id = %location.id, name = %location.name, "Location selected");
        self.selected = Some(location);
        self.request_forecast();
    }

    /// Geocode free-form input into one new saved location and select it.
    pub async fn add_location(&mut self, input: &str) -> Result<(), AddLocationError> {
        let location = self.resolver.add_manual(input).await?;
        self.select_location(location);
        Ok(())
    }

    /// Delete a saved location. Deleting the current selection clears the
    /// selection, forecast, summaries, and the persisted pointer.
    pub fn delete_location(&mut self, id: &str) {
        self.saved.retain(|l| l.id != id);
        self.prefs.save_locations(&self.saved);

        if self.selected.as_ref().is_some_and(|l| l.id == id) {
            self.selected = None;
            self.forecast = ForecastState::Idle;
            self.last_fetch_key = None;
            self.timeline_memo = None;
            self.summaries.invalidate_all();
            self.prefs.clear_last_selected();
            tracing::info!(%id, "Selected location deleted; session cleared");
        }
    }

    /// Change the summary tone. Clears every cached summary and opens a
    /// bounded transition period; never refetches the forecast.
    pub fn set_personality(&mut self, personality: Personality) {
        if personality == self.personality {
            return;
        }
        self.personality = personality;
        self.prefs.save_personality(personality.id());
        self.summaries.invalidate_all();

        self.in_transition = true;
        self.transition_epoch += 1;
        let epoch = self.transition_epoch;
        let tx = self.tx.clone();
        self.scheduler.schedule(TRANSITION_KEY, self.timing.transition_cap, move || {
            let _ = tx.send(SessionEvent::TransitionExpired { epoch });
        });

        self.schedule_summary_debounce();
    }

    /// Switch the display window. Pure recomputation, no network; a summary
    /// is requested only when the slot has none yet.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        if timeframe == self.timeframe {
            return;
        }
        self.timeframe = timeframe;
        if matches!(self.forecast, ForecastState::Ready(_))
            && matches!(
                self.summaries.state(timeframe, self.personality),
                SummaryState::Absent
            )
        {
            self.schedule_summary_debounce();
        }
    }

    /// Switch the timeline metric. Pure recomputation, no network.
    pub fn set_metric(&mut self, metric: MetricId) {
        self.metric = metric;
    }

    /// The metrics currently offered for selection. The seasonal snow
    /// entry follows the calendar and, once a forecast is in hand, the
    /// current temperature; without data only the calendar applies.
    pub fn available_metrics(&self) -> Vec<&'static MetricSpec> {
        let month = Local::now().month();
        let current_temperature = match &self.forecast {
            ForecastState::Ready(payload) => payload.currently.temperature,
            _ => 35.0,
        };
        metric_catalog(month, current_temperature)
    }

    /// Feed one search keystroke to the debounced resolver.
    pub fn search_input(&self, text: &str) {
        self.resolver.on_input(text);
    }

    /// Cancel search and clear results.
    pub fn clear_search(&mut self) {
        self.resolver.clear();
    }

    /// Apply one background event.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ForecastFetched { location_id, key, result } => {
                self.on_forecast_fetched(location_id, key, result);
            }
            SessionEvent::SummaryDebounceElapsed { epoch } => {
                if epoch != self.summaries.epoch() {
                    tracing::debug!("Ignoring stale summary debounce");
                    return;
                }
                self.request_summary();
            }
            SessionEvent::SummaryDone { timeframe, personality, epoch, result } => {
                self.on_summary_done(timeframe, personality, epoch, result);
            }
            SessionEvent::TransitionExpired { epoch } => {
                if epoch == self.transition_epoch {
                    self.in_transition = false;
                }
            }
            SessionEvent::Search(SearchEvent::Results { seq, results }) => {
                if seq < self.search_seq {
                    tracing::debug!(seq, "Ignoring stale search results");
                    return;
                }
                self.search_seq = seq;
                self.search_results = results;
            }
            SessionEvent::Search(SearchEvent::Cleared) => {
                self.search_results.clear();
            }
        }
    }

    /// Timeline series for the active (timeframe, metric), memoized on the
    /// forecast generation. Summary-cache changes never recompute this.
    pub fn timeline(&mut self) -> Vec<MetricPoint> {
        let key = (self.forecast_generation, self.timeframe, self.metric);
        if let Some((memo_key, points)) = &self.timeline_memo {
            if *memo_key == key {
                return points.clone();
            }
        }

        let points = match &self.forecast {
            ForecastState::Ready(payload) => {
                metric_series(payload, self.timeframe, self.metric, Local::now().naive_local())
            }
            _ => Vec::new(),
        };
        self.timeline_memo = Some((key, points.clone()));
        points
    }

    /// The composed display payload for the active timeframe.
    pub fn view_model(&self) -> SessionView {
        let window = match &self.forecast {
            ForecastState::Ready(payload) => Some(derive_window(
                payload,
                self.timeframe,
                Local::now().naive_local(),
            )),
            _ => None,
        };

        SessionView {
            location_name: self.selected.as_ref().map(|l| l.name.clone()),
            saved_locations: self.saved.clone(),
            timeframe: self.timeframe,
            personality: self.personality,
            metric: self.metric,
            metrics: self
                .available_metrics()
                .iter()
                .map(|spec| MetricOption { id: spec.id, label: spec.label })
                .collect(),
            window,
            summary: SummaryDisplay::from(self.summaries.state(self.timeframe, self.personality)),
            loading: matches!(self.forecast, ForecastState::Loading),
            forecast_error: match &self.forecast {
                ForecastState::Error(message) => Some(message.clone()),
                _ => None,
            },
            in_transition: self.in_transition,
            search_results: self.search_results.clone(),
        }
    }

    pub fn selected_location(&self) -> Option<&Location> {
        self.selected.as_ref()
    }

    pub fn saved_locations(&self) -> &[Location] {
        &self.saved
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn forecast_state(&self) -> &ForecastState {
        &self.forecast
    }

    fn request_forecast(&mut self) {
        let Some(location) = &self.selected else {
            return;
        };

        let key = FetchKey::new(location.latitude, location.longitude);
        if self.last_fetch_key == Some(key) && matches!(self.forecast, ForecastState::Ready(_)) {
            // Same coordinates and data in hand; personality or timeframe
            // changes never warrant a refetch.
            tracing::debug!("Forecast already current; skipping fetch");
            return;
        }

        self.forecast = ForecastState::Loading;
        let client = self.forecast_client.clone();
        let tx = self.tx.clone();
        let location_id = location.id.clone();
        let (lat, lon) = (location.latitude, location.longitude);
        tokio::spawn(async move {
            let result = client.fetch(lat, lon).await;
            let _ = tx.send(SessionEvent::ForecastFetched { location_id, key, result });
        });
    }

    fn on_forecast_fetched(
        &mut self,
        location_id: String,
        key: FetchKey,
        result: Result<ForecastPayload, vibecast_forecast::ForecastError>,
    ) {
        if !self.selected.as_ref().is_some_and(|l| l.id == location_id) {
            tracing::debug!(%location_id, "Dropping forecast for a stale location");
            return;
        }

        match result {
            Ok(payload) => {
                self.forecast = ForecastState::Ready(payload);
                self.last_fetch_key = Some(key);
                self.forecast_generation += 1;
                self.timeline_memo = None;
                // Numbers embedded in prior prompts are now stale.
                self.summaries.invalidate_all();
                self.schedule_summary_debounce();
            }
            Err(e) => {
                tracing::warn!("Forecast fetch failed: {}", e);
                self.forecast = ForecastState::Error(e.user_message());
                self.last_fetch_key = None;
            }
        }
    }

    fn schedule_summary_debounce(&self) {
        let epoch = self.summaries.epoch();
        let tx = self.tx.clone();
        self.scheduler
            .schedule(SUMMARY_DEBOUNCE_KEY, self.timing.summary_debounce, move || {
                let _ = tx.send(SessionEvent::SummaryDebounceElapsed { epoch });
            });
    }

    /// Request generation for the active slot. No-op without forecast data
    /// or when the slot is already pending or filled.
    fn request_summary(&mut self) {
        let ForecastState::Ready(payload) = &self.forecast else {
            return;
        };
        let timeframe = self.timeframe;
        let personality = self.personality;
        let Some(epoch) = self.summaries.try_begin(timeframe, personality) else {
            return;
        };

        let messages = build_messages(payload, timeframe, personality, Local::now().naive_local());
        let client = self.summary_client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.complete(&messages).await;
            let _ = tx.send(SessionEvent::SummaryDone { timeframe, personality, epoch, result });
        });
    }

    fn on_summary_done(
        &mut self,
        timeframe: Timeframe,
        personality: Personality,
        epoch: u64,
        result: Result<String, vibecast_summary::SummaryError>,
    ) {
        match result {
            Ok(text) => self.summaries.commit_ready(timeframe, personality, epoch, text),
            Err(e) => {
                // Generation failures are recovered locally, never surfaced.
                tracing::warn!("Summary generation failed: {}", e);
                let text = match &self.forecast {
                    ForecastState::Ready(payload) => {
                        fallback_text(payload, timeframe, Local::now().naive_local())
                    }
                    _ => "Weather details are unavailable right now.".to_string(),
                };
                self.summaries.commit_fallback(timeframe, personality, epoch, text);
            }
        }

        // A terminal state for the active slot ends the transition early.
        if self.in_transition && timeframe == self.timeframe && personality == self.personality {
            if matches!(
                self.summaries.state(timeframe, personality),
                SummaryState::Ready(_) | SummaryState::Fallback(_)
            ) {
                self.in_transition = false;
            }
        }
    }
}

impl Drop for WeatherSession {
    fn drop(&mut self) {
        self.scheduler.shutdown();
    }
}
