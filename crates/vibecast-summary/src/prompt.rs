//! Prompt construction: one template per timeframe, wrapped with the active
//! personality's instruction and a fixed system preamble.

use chrono::{Datelike, NaiveDateTime};

use vibecast_forecast::{week_stats, weekend_indices, ForecastPayload, Timeframe};

use crate::client::ChatMessage;
use crate::personality::Personality;

/// Word-count ceiling embedded in every prompt.
const WORD_LIMIT: u32 = 30;

/// The fixed system preamble plus the personality prefix.
pub fn system_message(personality: Personality) -> String {
    format!("You are an AI assistant. {}", personality.prompt_prefix())
}

/// The timeframe-specific user prompt, embedding the relevant derived
/// numbers. Short payloads produce prompts with fewer numbers, never errors.
pub fn timeframe_prompt(payload: &ForecastPayload, timeframe: Timeframe, now: NaiveDateTime) -> String {
    match timeframe {
        Timeframe::Now => {
            let current = &payload.currently;
            format!(
                "In at most {WORD_LIMIT} words, give a conversational summary of the current weather: \
                 {}, {:.0}°F, feels like {:.0}°F, humidity {:.0}%, wind {:.0} mph.",
                current.summary,
                current.temperature,
                current.apparent_temperature,
                current.humidity * 100.0,
                current.wind_speed
            )
        }
        Timeframe::Today => day_prompt(payload, "today", 0),
        Timeframe::Tomorrow => day_prompt(payload, "tomorrow", 1),
        Timeframe::Week => {
            let stats = week_stats(&payload.daily.data);
            let averages = stats
                .map(|(high, low, spread)| {
                    format!(" Average high {high}°F, average low {low}°F, high spread {spread}°F.")
                })
                .unwrap_or_default();
            format!(
                "In at most {WORD_LIMIT} words, give a conversational summary of the week ahead: {}{}",
                payload.daily.summary, averages
            )
        }
        Timeframe::Weekend => {
            let (saturday_idx, sunday_idx) = weekend_indices(now.weekday().num_days_from_sunday());
            let saturday = payload
                .daily
                .data
                .get(saturday_idx)
                .map(|d| {
                    format!(
                        "Saturday: {}, high {:.0}°F, low {:.0}°F.",
                        d.summary, d.temperature_high, d.temperature_low
                    )
                })
                .unwrap_or_default();
            let sunday = payload
                .daily
                .data
                .get(sunday_idx)
                .map(|d| {
                    format!(
                        " Sunday: {}, high {:.0}°F, low {:.0}°F.",
                        d.summary, d.temperature_high, d.temperature_low
                    )
                })
                .unwrap_or_default();
            format!(
                "In at most {WORD_LIMIT} words, give a conversational summary of the upcoming weekend. {}{}",
                saturday, sunday
            )
        }
    }
}

fn day_prompt(payload: &ForecastPayload, label: &str, index: usize) -> String {
    let numbers = payload
        .daily
        .data
        .get(index)
        .map(|d| {
            format!(
                "{}, high {:.0}°F, low {:.0}°F, humidity {:.0}%.",
                d.summary,
                d.temperature_high,
                d.temperature_low,
                d.humidity * 100.0
            )
        })
        .unwrap_or_default();
    format!(
        "In at most {WORD_LIMIT} words, give a conversational summary of {label}'s weather: {}",
        numbers
    )
}

/// The chat message pair sent to the text-generation provider.
pub fn build_messages(
    payload: &ForecastPayload,
    timeframe: Timeframe,
    personality: Personality,
    now: NaiveDateTime,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_message(personality)),
        ChatMessage::user(timeframe_prompt(payload, timeframe, now)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vibecast_forecast::{CurrentConditions, DailyRecord};

    fn sample_payload() -> ForecastPayload {
        ForecastPayload {
            currently: CurrentConditions {
                summary: "Clear".to_string(),
                temperature: 62.0,
                apparent_temperature: 60.0,
                humidity: 0.55,
                wind_speed: 6.0,
                ..CurrentConditions::default()
            },
            daily: vibecast_forecast::types::DailyBlock {
                summary: "Mild with rain midweek.".to_string(),
                data: (0..8)
                    .map(|i| DailyRecord {
                        summary: "Clear".to_string(),
                        temperature_high: 70.0 + i as f64,
                        temperature_low: 50.0 + i as f64,
                        humidity: 0.5,
                        ..DailyRecord::default()
                    })
                    .collect(),
            },
            ..ForecastPayload::default()
        }
    }

    fn wednesday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn system_preamble_is_fixed() {
        assert_eq!(system_message(Personality::Default), "You are an AI assistant. ");
        let snarky = system_message(Personality::Snarky);
        assert!(snarky.starts_with("You are an AI assistant. Your tone is set to: snarky."));
    }

    #[test]
    fn now_prompt_embeds_current_numbers() {
        let prompt = timeframe_prompt(&sample_payload(), Timeframe::Now, wednesday());
        assert!(prompt.contains("62°F"));
        assert!(prompt.contains("humidity 55%"));
        assert!(prompt.contains("at most 30 words"));
    }

    #[test]
    fn week_prompt_passes_provider_summary_and_averages() {
        let prompt = timeframe_prompt(&sample_payload(), Timeframe::Week, wednesday());
        assert!(prompt.contains("Mild with rain midweek."));
        assert!(prompt.contains("Average high 73°F"));
    }

    #[test]
    fn weekend_prompt_uses_the_upcoming_pair() {
        let prompt = timeframe_prompt(&sample_payload(), Timeframe::Weekend, wednesday());
        // Wednesday: Saturday index 3 (high 73), Sunday index 4 (high 74).
        assert!(prompt.contains("Saturday: Clear, high 73°F"));
        assert!(prompt.contains("Sunday: Clear, high 74°F"));
    }

    #[test]
    fn messages_pair_system_with_user() {
        let messages = build_messages(&sample_payload(), Timeframe::Today, Personality::Marvin, wednesday());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Paranoid Android"));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("today's weather"));
    }
}
