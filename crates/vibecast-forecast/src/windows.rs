//! Derivation of display-ready time windows from a forecast payload.
//!
//! Pure and deterministic given the payload and a wall-clock timestamp.
//! Short or missing provider arrays yield shorter windows, never errors.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{format_temp, DailyRecord, ForecastPayload};

/// The user-selectable display window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    #[default]
    Now,
    Today,
    Tomorrow,
    Week,
    Weekend,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Now,
        Timeframe::Today,
        Timeframe::Tomorrow,
        Timeframe::Week,
        Timeframe::Weekend,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Timeframe::Now => "now",
            Timeframe::Today => "today",
            Timeframe::Tomorrow => "tomorrow",
            Timeframe::Week => "week",
            Timeframe::Weekend => "weekend",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Timeframe::Now => "Now",
            Timeframe::Today => "Today",
            Timeframe::Tomorrow => "Tomorrow",
            Timeframe::Week => "This Week",
            Timeframe::Weekend => "This Weekend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowDetail {
    pub label: String,
    pub value: String,
}

impl WindowDetail {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// A derived display window. Never mutated in place; switching timeframes
/// selects a different derived window.
#[derive(Debug, Clone, Serialize)]
pub struct TimeWindow {
    pub timeframe: Timeframe,
    pub title: String,
    pub summary_text: String,
    pub headline: String,
    pub secondary: String,
    pub details: Vec<WindowDetail>,
}

impl TimeWindow {
    fn empty(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            title: timeframe.title().to_string(),
            summary_text: String::new(),
            headline: String::new(),
            secondary: String::new(),
            details: Vec::new(),
        }
    }
}

/// Daily-array indices for the upcoming Saturday/Sunday pair.
///
/// `weekday` counts from Sunday = 0 (calendar convention of the provider
/// payload's consumers). When today is Saturday the offset is 7, never 0:
/// "weekend" always means the upcoming pair, not a today-inclusive one.
pub fn weekend_indices(weekday: u32) -> (usize, usize) {
    let days_until_saturday = if weekday == 6 { 7 } else { (6 - weekday) % 7 };
    let sunday = (days_until_saturday + 1) % 7;
    (days_until_saturday as usize, sunday as usize)
}

/// Rounded arithmetic means and high spread over the first 7 daily records.
pub fn week_stats(daily: &[DailyRecord]) -> Option<(i64, i64, i64)> {
    let days: Vec<&DailyRecord> = daily.iter().take(7).collect();
    if days.is_empty() {
        return None;
    }

    let n = days.len() as f64;
    let mean_high = (days.iter().map(|d| d.temperature_high).sum::<f64>() / n).round() as i64;
    let mean_low = (days.iter().map(|d| d.temperature_low).sum::<f64>() / n).round() as i64;

    let max_high = days
        .iter()
        .map(|d| d.temperature_high)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_high = days
        .iter()
        .map(|d| d.temperature_high)
        .fold(f64::INFINITY, f64::min);
    let spread = (max_high - min_high).round() as i64;

    Some((mean_high, mean_low, spread))
}

/// Derive one display window from the payload.
pub fn derive_window(payload: &ForecastPayload, timeframe: Timeframe, now: NaiveDateTime) -> TimeWindow {
    match timeframe {
        Timeframe::Now => now_window(payload),
        Timeframe::Today => day_window(payload, Timeframe::Today, 0),
        Timeframe::Tomorrow => day_window(payload, Timeframe::Tomorrow, 1),
        Timeframe::Week => week_window(payload),
        Timeframe::Weekend => weekend_window(payload, now),
    }
}

/// Derive all five windows, e.g. after a forecast fetch.
pub fn derive_all(payload: &ForecastPayload, now: NaiveDateTime) -> Vec<TimeWindow> {
    Timeframe::ALL
        .iter()
        .map(|tf| derive_window(payload, *tf, now))
        .collect()
}

fn now_window(payload: &ForecastPayload) -> TimeWindow {
    let current = &payload.currently;
    let mut window = TimeWindow::empty(Timeframe::Now);
    window.summary_text = current.summary.clone();
    window.headline = if current.summary.is_empty() {
        format_temp(current.temperature)
    } else {
        format!("{}, {}", current.summary, format_temp(current.temperature))
    };
    window.secondary = format!("Feels like {}", format_temp(current.apparent_temperature));
    window.details = vec![
        WindowDetail::new("Feels like", format_temp(current.apparent_temperature)),
        WindowDetail::new("Humidity", format!("{}%", (current.humidity * 100.0).round() as i64)),
        WindowDetail::new("Wind", format!("{} mph", current.wind_speed.round() as i64)),
        WindowDetail::new("UV Index", format!("{}", current.uv_index.round() as i64)),
        WindowDetail::new("Visibility", format!("{} miles", current.visibility)),
    ];
    window
}

fn day_window(payload: &ForecastPayload, timeframe: Timeframe, index: usize) -> TimeWindow {
    let mut window = TimeWindow::empty(timeframe);
    let Some(day) = payload.daily.data.get(index) else {
        return window;
    };

    window.summary_text = day.summary.clone();
    window.headline = format!("High: {}", format_temp(day.temperature_high));
    window.secondary = format!("Low: {}", format_temp(day.temperature_low));
    window.details = vec![
        WindowDetail::new("Sunrise", clock_label(day.sunrise_time)),
        WindowDetail::new("Sunset", clock_label(day.sunset_time)),
        WindowDetail::new("Humidity", format!("{}%", (day.humidity * 100.0).round() as i64)),
        WindowDetail::new("UV Index", format!("{}", day.uv_index.round() as i64)),
    ];
    window
}

fn week_window(payload: &ForecastPayload) -> TimeWindow {
    let mut window = TimeWindow::empty(Timeframe::Week);
    window.summary_text = payload.daily.summary.clone();

    let Some((mean_high, mean_low, spread)) = week_stats(&payload.daily.data) else {
        return window;
    };

    window.headline = format!("Avg high: {}°F", mean_high);
    window.secondary = format!("Avg low: {}°F", mean_low);
    window.details.push(WindowDetail::new("High spread", format!("{}°F", spread)));

    for day in payload.daily.data.iter().take(7) {
        window.details.push(WindowDetail::new(
            &day_label(day.time),
            format!(
                "{}, High: {}, Low: {}",
                day.summary,
                format_temp(day.temperature_high),
                format_temp(day.temperature_low)
            ),
        ));
    }
    window
}

fn weekend_window(payload: &ForecastPayload, now: NaiveDateTime) -> TimeWindow {
    let mut window = TimeWindow::empty(Timeframe::Weekend);
    let (saturday_idx, sunday_idx) = weekend_indices(now.weekday().num_days_from_sunday());

    let saturday = payload.daily.data.get(saturday_idx);
    let sunday = payload.daily.data.get(sunday_idx);

    if let Some(sat) = saturday {
        window.summary_text = format!("Weekend forecast: {}", sat.summary);
        window.headline = format!("Sat high: {}", format_temp(sat.temperature_high));
        window.details.push(WindowDetail::new(
            "Saturday",
            format!(
                "{}, High: {}, Low: {}",
                sat.summary,
                format_temp(sat.temperature_high),
                format_temp(sat.temperature_low)
            ),
        ));
    }
    if let Some(sun) = sunday {
        window.secondary = format!("Sun high: {}", format_temp(sun.temperature_high));
        window.details.push(WindowDetail::new(
            "Sunday",
            format!(
                "{}, High: {}, Low: {}",
                sun.summary,
                format_temp(sun.temperature_high),
                format_temp(sun.temperature_low)
            ),
        ));
    }
    window
}

/// Local clock label for a unix timestamp, e.g. "6:42 AM".
fn clock_label(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Local weekday name for a unix timestamp, e.g. "Monday".
fn day_label(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%A").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily(highs: &[f64], lows: &[f64]) -> Vec<DailyRecord> {
        highs
            .iter()
            .zip(lows.iter())
            .map(|(&h, &l)| DailyRecord {
                temperature_high: h,
                temperature_low: l,
                summary: "Clear".to_string(),
                ..DailyRecord::default()
            })
            .collect()
    }

    fn payload_with_days(count: usize) -> ForecastPayload {
        let highs: Vec<f64> = (0..count).map(|i| 60.0 + i as f64).collect();
        let lows: Vec<f64> = (0..count).map(|i| 40.0 + i as f64).collect();
        ForecastPayload {
            daily: crate::types::DailyBlock {
                summary: "Mild all week".to_string(),
                data: daily(&highs, &lows),
            },
            ..ForecastPayload::default()
        }
    }

    fn at(date: (i32, u32, u32), hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn weekend_on_saturday_skips_to_next_weekend() {
        // Saturday (weekday 6) must look at the next pair, never (0, 1).
        assert_eq!(weekend_indices(6), (7, 1));
    }

    #[test]
    fn weekend_indices_all_weekdays_in_range() {
        for weekday in 0..7 {
            let (sat, sun) = weekend_indices(weekday);
            assert!(sat <= 7, "saturday index out of range for weekday {weekday}");
            assert!(sun < 7, "sunday index out of range for weekday {weekday}");
            assert_eq!(sun, (sat + 1) % 7);
        }
    }

    #[test]
    fn weekend_indices_plain_cases() {
        assert_eq!(weekend_indices(0), (6, 0)); // Sunday
        assert_eq!(weekend_indices(3), (3, 4)); // Wednesday
        assert_eq!(weekend_indices(5), (1, 2)); // Friday
    }

    #[test]
    fn week_stats_mean_and_spread() {
        let days = daily(
            &[70.0, 72.0, 68.0, 75.0, 71.0, 69.0, 73.0],
            &[50.0, 52.0, 48.0, 55.0, 51.0, 49.0, 53.0],
        );
        let (mean_high, mean_low, spread) = week_stats(&days).unwrap();
        assert_eq!(mean_high, 71);
        assert_eq!(mean_low, 51);
        assert_eq!(spread, 7);
    }

    #[test]
    fn week_stats_empty_daily_is_none() {
        assert!(week_stats(&[]).is_none());
    }

    #[test]
    fn week_window_passes_provider_summary_through() {
        let payload = payload_with_days(8);
        let window = derive_window(&payload, Timeframe::Week, at((2026, 8, 19), 9));
        assert_eq!(window.summary_text, "Mild all week");
        assert!(window.headline.starts_with("Avg high:"));
        assert_eq!(window.details[0].label, "High spread");
    }

    #[test]
    fn weekend_window_on_saturday_uses_day_seven() {
        // 2026-08-22 is a Saturday.
        let payload = payload_with_days(8);
        let window = derive_window(&payload, Timeframe::Weekend, at((2026, 8, 22), 10));
        // Saturday index 7 -> high 67, Sunday index 1 -> high 61.
        assert!(window.headline.contains("67°F"), "{}", window.headline);
        assert!(window.secondary.contains("61°F"), "{}", window.secondary);
    }

    #[test]
    fn short_daily_array_degrades_to_partial_window() {
        // Saturday lookahead needs index 7; only 3 days available.
        let payload = payload_with_days(3);
        let window = derive_window(&payload, Timeframe::Weekend, at((2026, 8, 22), 10));
        assert!(window.headline.is_empty());
        // Sunday index 1 still resolves.
        assert_eq!(window.details.len(), 1);
        assert_eq!(window.details[0].label, "Sunday");
    }

    #[test]
    fn tomorrow_window_missing_daily_is_empty_not_error() {
        let payload = ForecastPayload::default();
        let window = derive_window(&payload, Timeframe::Tomorrow, at((2026, 8, 19), 9));
        assert!(window.headline.is_empty());
        assert!(window.details.is_empty());
        assert_eq!(window.title, "Tomorrow");
    }

    #[test]
    fn now_window_reads_current_conditions() {
        let payload = ForecastPayload {
            currently: crate::types::CurrentConditions {
                summary: "Partly Cloudy".to_string(),
                temperature: 61.6,
                apparent_temperature: 59.2,
                humidity: 0.64,
                wind_speed: 7.3,
                uv_index: 4.0,
                visibility: 10.0,
                ..crate::types::CurrentConditions::default()
            },
            ..ForecastPayload::default()
        };
        let window = derive_window(&payload, Timeframe::Now, at((2026, 8, 19), 9));
        assert_eq!(window.headline, "Partly Cloudy, 62°F");
        assert_eq!(window.details[1].value, "64%");
        assert_eq!(window.details[2].value, "7 mph");
    }
}
