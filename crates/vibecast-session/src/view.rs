//! The composed view-model served to presentation.

use serde::Serialize;

use vibecast_forecast::{MetricId, TimeWindow, Timeframe};
use vibecast_locations::{Location, SearchResult};
use vibecast_summary::{Personality, SummaryState};

/// One selectable entry of the metric picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricOption {
    pub id: MetricId,
    pub label: &'static str,
}

/// Summary text as presentation sees it. Pending slots show a loading
/// indicator; ready and fallback text are indistinguishable on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "text")]
pub enum SummaryDisplay {
    Absent,
    Loading,
    Text(String),
}

impl From<&SummaryState> for SummaryDisplay {
    fn from(state: &SummaryState) -> Self {
        match state {
            SummaryState::Absent => SummaryDisplay::Absent,
            SummaryState::Pending => SummaryDisplay::Loading,
            SummaryState::Ready(text) | SummaryState::Fallback(text) => {
                SummaryDisplay::Text(text.clone())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub location_name: Option<String>,
    pub saved_locations: Vec<Location>,
    pub timeframe: Timeframe,
    pub personality: Personality,
    pub metric: MetricId,
    /// The metrics currently offered for selection; the snow entry comes
    /// and goes with the season and the current temperature.
    pub metrics: Vec<MetricOption>,
    /// The derived window for the active timeframe; None until a forecast
    /// is ready.
    pub window: Option<TimeWindow>,
    pub summary: SummaryDisplay,
    pub loading: bool,
    pub forecast_error: Option<String>,
    pub in_transition: bool,
    pub search_results: Vec<SearchResult>,
}
