//! Session orchestration for Vibecast.
//!
//! `WeatherSession` owns the selected location, timeframe, personality and
//! metric, coordinates forecast fetches with summary generation and search,
//! and composes the view-model served to presentation.

pub mod events;
pub mod session;
pub mod view;

pub use events::{FetchKey, SessionEvent};
pub use session::{ForecastState, SessionTiming, WeatherSession};
pub use view::{MetricOption, SessionView, SummaryDisplay};
