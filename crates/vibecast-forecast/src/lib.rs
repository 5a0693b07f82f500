//! Forecast data for Vibecast.
//!
//! Wraps a Pirate-Weather-style forecast API and turns its payload into the
//! display-ready time windows and metric timelines the session layer serves.

pub mod client;
pub mod metrics;
pub mod timeline;
pub mod types;
pub mod windows;

pub use client::{ForecastClient, ForecastError};
pub use metrics::{metric_catalog, metric_spec, MetricId, MetricSpec};
pub use timeline::{friday_offset, metric_series, MetricPoint};
pub use types::{format_temp, CurrentConditions, DailyRecord, ForecastPayload, HourlyRecord};
pub use windows::{
    derive_all, derive_window, week_stats, weekend_indices, TimeWindow, Timeframe, WindowDetail,
};
