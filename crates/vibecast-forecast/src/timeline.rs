//! Metric timeline series for the selected timeframe.
//!
//! Hourly windows: "now" takes the next 24 entries from index 0, "today"
//! takes entries until local midnight (24 − current hour), "tomorrow" starts
//! at the hours-until-midnight offset and takes 24. Daily windows: "week"
//! takes the first 7 entries, "weekend" the 4-day Friday..Monday span found
//! via an explicit day-of-week offset table. All slices clamp to whatever
//! data the provider returned.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::metrics::{metric_spec, MetricId};
use crate::types::ForecastPayload;
use crate::windows::Timeframe;

#[derive(Debug, Clone, Serialize)]
pub struct MetricPoint {
    pub id: String,
    pub time_label: String,
    pub value: f64,
    pub display_value: String,
    pub low_value: Option<f64>,
    pub intensity: f64,
    pub is_highlighted: bool,
}

/// Daily-array offset of the next Friday, counting from Sunday = 0.
///
/// Friday maps to 0 (today), Saturday to 6 (next week's Friday), Sunday to 5,
/// Monday through Thursday to `5 - weekday`. The Saturday entry deliberately
/// rolls to the upcoming weekend rather than the one in progress.
pub fn friday_offset(weekday: u32) -> usize {
    match weekday {
        5 => 0,
        6 => 6,
        0 => 5,
        other => (5 - other) as usize,
    }
}

/// Build the series for the selected metric and timeframe.
pub fn metric_series(
    payload: &ForecastPayload,
    timeframe: Timeframe,
    metric: MetricId,
    now: NaiveDateTime,
) -> Vec<MetricPoint> {
    let spec = metric_spec(metric);
    let current_hour = now.hour() as usize;

    match timeframe {
        Timeframe::Now => hourly_points(payload, spec, 0, 24, true),
        Timeframe::Today => hourly_points(payload, spec, 0, 24 - current_hour, false),
        Timeframe::Tomorrow => hourly_points(payload, spec, 24 - current_hour, 24, false),
        Timeframe::Week => daily_points(payload, spec, 0, 7),
        Timeframe::Weekend => {
            let start = friday_offset(now.weekday().num_days_from_sunday());
            daily_points(payload, spec, start, 4)
        }
    }
}

fn hourly_points(
    payload: &ForecastPayload,
    spec: &'static crate::metrics::MetricSpec,
    start: usize,
    count: usize,
    label_first_now: bool,
) -> Vec<MetricPoint> {
    payload
        .hourly
        .data
        .iter()
        .skip(start)
        .take(count)
        .enumerate()
        .map(|(i, hour)| {
            let value = (spec.extract_hourly)(hour);
            let time_label = if label_first_now && i == 0 {
                "Now".to_string()
            } else {
                hour_label(hour.time)
            };
            MetricPoint {
                id: format!("{}-{}", spec.id.id(), i),
                time_label,
                value,
                display_value: spec.display(value),
                low_value: None,
                intensity: spec.intensity(value),
                is_highlighted: i == 0,
            }
        })
        .collect()
}

fn daily_points(
    payload: &ForecastPayload,
    spec: &'static crate::metrics::MetricSpec,
    start: usize,
    count: usize,
) -> Vec<MetricPoint> {
    payload
        .daily
        .data
        .iter()
        .skip(start)
        .take(count)
        .enumerate()
        .map(|(i, day)| {
            let value = (spec.extract_daily)(day);
            MetricPoint {
                id: format!("{}-{}", spec.id.id(), i),
                time_label: weekday_label(day.time),
                value,
                display_value: spec.display(value),
                low_value: spec.extract_daily_low.map(|f| f(day)),
                intensity: spec.intensity(value),
                is_highlighted: i == 0,
            }
        })
        .collect()
}

fn hour_label(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%-I%p").to_string())
        .unwrap_or_default()
}

fn weekday_label(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%a").to_string())
        .unwrap_or_default()
}
