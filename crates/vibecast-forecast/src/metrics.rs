//! Table-driven metric catalog for the timeline bar chart.
//!
//! Each metric knows how to read an hourly or daily record, the raw range
//! used to normalize values into an intensity in [0, 1], and the ascending
//! thresholds that split intensity into four discrete color bands.

use serde::{Deserialize, Serialize};

use crate::types::{DailyRecord, HourlyRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    #[default]
    Temperature,
    FeelsLike,
    Humidity,
    RainProbability,
    Wind,
    UvIndex,
    Visibility,
    Snow,
}

impl MetricId {
    pub fn id(&self) -> &'static str {
        match self {
            MetricId::Temperature => "temperature",
            MetricId::FeelsLike => "feels_like",
            MetricId::Humidity => "humidity",
            MetricId::RainProbability => "rain_probability",
            MetricId::Wind => "wind",
            MetricId::UvIndex => "uv_index",
            MetricId::Visibility => "visibility",
            MetricId::Snow => "snow",
        }
    }
}

pub struct MetricSpec {
    pub id: MetricId,
    pub label: &'static str,
    pub extract_hourly: fn(&HourlyRecord) -> f64,
    pub extract_daily: fn(&DailyRecord) -> f64,
    /// Secondary daily value (the low bar for temperature-like metrics).
    pub extract_daily_low: Option<fn(&DailyRecord) -> f64>,
    /// Raw range mapped onto intensity 0..1.
    pub range: (f64, f64),
    /// Ascending intensity thresholds for bands 1..3; below the first is band 0.
    pub bands: [f64; 3],
    pub format: fn(f64) -> String,
}

impl MetricSpec {
    /// Normalize a raw value into [0, 1].
    pub fn intensity(&self, value: f64) -> f64 {
        let (min, max) = self.range;
        if max <= min {
            return 0.0;
        }
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }

    /// Discrete color band 0..=3 for an intensity.
    pub fn color_band(&self, intensity: f64) -> usize {
        self.bands.iter().filter(|&&threshold| intensity >= threshold).count()
    }

    pub fn display(&self, value: f64) -> String {
        (self.format)(value)
    }
}

fn fmt_degrees(v: f64) -> String {
    format!("{}°", v.round() as i64)
}

fn fmt_percent(v: f64) -> String {
    format!("{}%", v.round() as i64)
}

fn fmt_mph(v: f64) -> String {
    format!("{} mph", v.round() as i64)
}

fn fmt_plain(v: f64) -> String {
    format!("{}", v.round() as i64)
}

fn fmt_miles(v: f64) -> String {
    format!("{} mi", v.round() as i64)
}

fn fmt_inches(v: f64) -> String {
    format!("{:.1} in", v)
}

static TEMPERATURE: MetricSpec = MetricSpec {
    id: MetricId::Temperature,
    label: "Temperature",
    extract_hourly: |h| h.temperature,
    extract_daily: |d| d.temperature_high,
    extract_daily_low: Some(|d| d.temperature_low),
    range: (0.0, 100.0),
    bands: [0.3, 0.6, 0.8],
    format: fmt_degrees,
};

static FEELS_LIKE: MetricSpec = MetricSpec {
    id: MetricId::FeelsLike,
    label: "Feels Like",
    extract_hourly: |h| h.apparent_temperature,
    extract_daily: |d| d.temperature_high,
    extract_daily_low: Some(|d| d.temperature_low),
    range: (0.0, 100.0),
    bands: [0.3, 0.6, 0.8],
    format: fmt_degrees,
};

static HUMIDITY: MetricSpec = MetricSpec {
    id: MetricId::Humidity,
    label: "Humidity",
    extract_hourly: |h| h.humidity * 100.0,
    extract_daily: |d| d.humidity * 100.0,
    extract_daily_low: None,
    range: (0.0, 100.0),
    bands: [0.4, 0.7, 0.9],
    format: fmt_percent,
};

static RAIN_PROBABILITY: MetricSpec = MetricSpec {
    id: MetricId::RainProbability,
    label: "Rain Chance",
    extract_hourly: |h| h.precip_probability * 100.0,
    extract_daily: |d| d.precip_probability * 100.0,
    extract_daily_low: None,
    range: (0.0, 100.0),
    bands: [0.25, 0.5, 0.75],
    format: fmt_percent,
};

static WIND: MetricSpec = MetricSpec {
    id: MetricId::Wind,
    label: "Wind",
    extract_hourly: |h| h.wind_speed,
    extract_daily: |d| d.wind_speed,
    extract_daily_low: None,
    range: (0.0, 40.0),
    bands: [0.25, 0.5, 0.75],
    format: fmt_mph,
};

static UV_INDEX: MetricSpec = MetricSpec {
    id: MetricId::UvIndex,
    label: "UV Index",
    extract_hourly: |h| h.uv_index,
    extract_daily: |d| d.uv_index,
    extract_daily_low: None,
    range: (0.0, 11.0),
    bands: [0.27, 0.55, 0.73],
    format: fmt_plain,
};

static VISIBILITY: MetricSpec = MetricSpec {
    id: MetricId::Visibility,
    label: "Visibility",
    extract_hourly: |h| h.visibility,
    extract_daily: |d| d.visibility,
    extract_daily_low: None,
    range: (0.0, 10.0),
    bands: [0.3, 0.6, 0.8],
    format: fmt_miles,
};

static SNOW: MetricSpec = MetricSpec {
    id: MetricId::Snow,
    label: "Snow",
    extract_hourly: |h| h.precip_accumulation,
    extract_daily: |d| d.precip_accumulation,
    extract_daily_low: None,
    range: (0.0, 6.0),
    bands: [0.2, 0.5, 0.8],
    format: fmt_inches,
};

/// Look up a metric's table entry.
pub fn metric_spec(id: MetricId) -> &'static MetricSpec {
    match id {
        MetricId::Temperature => &TEMPERATURE,
        MetricId::FeelsLike => &FEELS_LIKE,
        MetricId::Humidity => &HUMIDITY,
        MetricId::RainProbability => &RAIN_PROBABILITY,
        MetricId::Wind => &WIND,
        MetricId::UvIndex => &UV_INDEX,
        MetricId::Visibility => &VISIBILITY,
        MetricId::Snow => &SNOW,
    }
}

/// The metric catalog offered for selection. Snow is seasonal: it appears
/// only in winter months (Dec/Jan/Feb) or when the current temperature is
/// below 35°F.
pub fn metric_catalog(month: u32, current_temperature: f64) -> Vec<&'static MetricSpec> {
    let mut catalog = vec![
        &TEMPERATURE,
        &FEELS_LIKE,
        &HUMIDITY,
        &RAIN_PROBABILITY,
        &WIND,
        &UV_INDEX,
        &VISIBILITY,
    ];

    let winter = month == 12 || month == 1 || month == 2;
    if winter || current_temperature < 35.0 {
        catalog.push(&SNOW);
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_clamps_to_unit_interval() {
        let spec = metric_spec(MetricId::Temperature);
        assert_eq!(spec.intensity(-20.0), 0.0);
        assert_eq!(spec.intensity(150.0), 1.0);
        assert!((spec.intensity(50.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn temperature_bands_split_at_thresholds() {
        let spec = metric_spec(MetricId::Temperature);
        assert_eq!(spec.color_band(0.0), 0);
        assert_eq!(spec.color_band(0.29), 0);
        assert_eq!(spec.color_band(0.3), 1);
        assert_eq!(spec.color_band(0.6), 2);
        assert_eq!(spec.color_band(0.95), 3);
    }

    #[test]
    fn snow_appears_in_winter_months() {
        for month in [12, 1, 2] {
            let catalog = metric_catalog(month, 70.0);
            assert!(catalog.iter().any(|m| m.id == MetricId::Snow), "month {month}");
        }
    }

    #[test]
    fn snow_appears_when_cold_regardless_of_month() {
        let catalog = metric_catalog(7, 30.0);
        assert!(catalog.iter().any(|m| m.id == MetricId::Snow));
    }

    #[test]
    fn snow_absent_in_a_warm_summer() {
        let catalog = metric_catalog(7, 80.0);
        assert!(!catalog.iter().any(|m| m.id == MetricId::Snow));
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn humidity_extraction_scales_to_percent() {
        let spec = metric_spec(MetricId::Humidity);
        let hour = crate::types::HourlyRecord {
            humidity: 0.42,
            ..crate::types::HourlyRecord::default()
        };
        assert!(((spec.extract_hourly)(&hour) - 42.0).abs() < 1e-9);
        assert_eq!(spec.display(42.0), "42%");
    }
}
