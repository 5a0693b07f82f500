//! Wire types for the forecast provider payload.
//!
//! Every numeric field defaults to 0 when the provider omits it, so window
//! derivation degrades instead of failing.

use serde::{Deserialize, Serialize};

/// Point-in-time conditions (`currently` block).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentConditions {
    pub time: i64,
    pub summary: String,
    pub temperature: f64,
    pub apparent_temperature: f64,
    /// 0..1 fraction as delivered by the provider.
    pub humidity: f64,
    pub wind_speed: f64,
    pub uv_index: f64,
    pub visibility: f64,
    pub precip_probability: f64,
}

/// One hourly record, earliest first, starting at "now" or the top of the
/// current hour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HourlyRecord {
    pub time: i64,
    pub summary: String,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub humidity: f64,
    pub precip_probability: f64,
    pub precip_accumulation: f64,
    pub wind_speed: f64,
    pub uv_index: f64,
    pub visibility: f64,
}

/// One daily record, index 0 = today.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyRecord {
    pub time: i64,
    pub summary: String,
    pub temperature_high: f64,
    pub temperature_low: f64,
    pub sunrise_time: i64,
    pub sunset_time: i64,
    pub humidity: f64,
    pub uv_index: f64,
    pub precip_probability: f64,
    pub precip_accumulation: f64,
    pub wind_speed: f64,
    pub visibility: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyBlock {
    pub summary: String,
    pub data: Vec<HourlyRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyBlock {
    /// Provider free text for the week ahead; passed through verbatim.
    pub summary: String,
    pub data: Vec<DailyRecord>,
}

/// Complete forecast payload for one location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastPayload {
    pub latitude: f64,
    pub longitude: f64,
    pub currently: CurrentConditions,
    pub hourly: HourlyBlock,
    pub daily: DailyBlock,
}

/// Round-and-format a Fahrenheit temperature for display.
pub fn format_temp(temp: f64) -> String {
    format!("{}°F", temp.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_default_to_zero() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"currently": {"summary": "Clear"}, "hourly": {}, "daily": {"summary": "mild"}}"#,
        )
        .unwrap();

        assert_eq!(payload.currently.summary, "Clear");
        assert_eq!(payload.currently.temperature, 0.0);
        assert!(payload.hourly.data.is_empty());
        assert_eq!(payload.daily.summary, "mild");
    }

    #[test]
    fn camel_case_fields_deserialize() {
        let record: HourlyRecord = serde_json::from_str(
            r#"{"time": 1700000000, "apparentTemperature": 61.5, "precipProbability": 0.2}"#,
        )
        .unwrap();
        assert_eq!(record.apparent_temperature, 61.5);
        assert_eq!(record.precip_probability, 0.2);
    }

    #[test]
    fn format_temp_rounds() {
        assert_eq!(format_temp(71.4), "71°F");
        assert_eq!(format_temp(71.5), "72°F");
    }
}
