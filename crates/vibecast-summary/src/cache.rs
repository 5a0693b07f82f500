//! Per-(timeframe, personality) summary cache.
//!
//! Entries are keyed on the pair so switching personality never shows text
//! generated under another tone. An epoch counter stamps in-flight requests;
//! a forecast refresh bumps the epoch, so stale completions are dropped on
//! commit instead of overwriting fresh state.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use vibecast_forecast::{derive_window, ForecastPayload, Timeframe};

use crate::personality::Personality;

/// Lifecycle of one cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryState {
    /// Nothing requested yet for this slot.
    #[default]
    Absent,
    /// A request is in flight; further begins for this slot are refused.
    Pending,
    /// Provider text, served from cache until the next forecast refresh.
    Ready(String),
    /// Locally derived text after a provider failure. Not re-requested
    /// until the next refresh.
    Fallback(String),
}

#[derive(Debug, Default)]
pub struct SummaryCache {
    entries: HashMap<(Timeframe, Personality), SummaryState>,
    epoch: u64,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Current state for a slot. Unrequested slots read as `Absent`.
    pub fn state(&self, timeframe: Timeframe, personality: Personality) -> &SummaryState {
        self.entries
            .get(&(timeframe, personality))
            .unwrap_or(&SummaryState::Absent)
    }

    /// Claim a slot for a new request. Returns the epoch to stamp the
    /// request with, or `None` when the slot is already pending or filled.
    pub fn try_begin(&mut self, timeframe: Timeframe, personality: Personality) -> Option<u64> {
        let slot = self.entries.entry((timeframe, personality)).or_default();
        match slot {
            SummaryState::Absent => {
                *slot = SummaryState::Pending;
                Some(self.epoch)
            }
            SummaryState::Pending | SummaryState::Ready(_) | SummaryState::Fallback(_) => None,
        }
    }

    /// Store provider text. Dropped silently when `epoch` is stale.
    pub fn commit_ready(
        &mut self,
        timeframe: Timeframe,
        personality: Personality,
        epoch: u64,
        text: String,
    ) {
        self.commit(timeframe, personality, epoch, SummaryState::Ready(text));
    }

    /// Store locally derived text after a provider failure. Dropped
    /// silently when `epoch` is stale.
    pub fn commit_fallback(
        &mut self,
        timeframe: Timeframe,
        personality: Personality,
        epoch: u64,
        text: String,
    ) {
        self.commit(timeframe, personality, epoch, SummaryState::Fallback(text));
    }

    fn commit(
        &mut self,
        timeframe: Timeframe,
        personality: Personality,
        epoch: u64,
        state: SummaryState,
    ) {
        if epoch != self.epoch {
            tracing::debug!(
                timeframe = timeframe.id(),
                personality = personality.id(),
                "Dropping stale summary commit"
            );
            return;
        }
        self.entries.insert((timeframe, personality), state);
    }

    /// Clear every slot and bump the epoch, e.g. after a forecast refresh
    /// or a location switch. In-flight requests stamped with the old epoch
    /// will be dropped on commit.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.epoch += 1;
    }
}

/// Deterministic local summary used when the provider call fails.
pub fn fallback_text(payload: &ForecastPayload, timeframe: Timeframe, now: NaiveDateTime) -> String {
    let window = derive_window(payload, timeframe, now);
    let parts: Vec<&str> = [window.headline.as_str(), window.secondary.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        "Weather details are unavailable right now.".to_string()
    } else {
        format!("{}.", parts.join(". "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vibecast_forecast::CurrentConditions;

    #[test]
    fn begin_claims_and_dedupes() {
        let mut cache = SummaryCache::new();
        let epoch = cache.try_begin(Timeframe::Now, Personality::Default);
        assert_eq!(epoch, Some(0));
        assert_eq!(
            cache.state(Timeframe::Now, Personality::Default),
            &SummaryState::Pending
        );

        // Second begin for the same slot is refused while pending.
        assert_eq!(cache.try_begin(Timeframe::Now, Personality::Default), None);
        // A different personality is a different slot.
        assert_eq!(cache.try_begin(Timeframe::Now, Personality::Snarky), Some(0));
    }

    #[test]
    fn ready_text_blocks_rerequests_until_invalidation() {
        let mut cache = SummaryCache::new();
        let epoch = cache.try_begin(Timeframe::Today, Personality::Default).unwrap();
        cache.commit_ready(Timeframe::Today, Personality::Default, epoch, "Sunny.".into());

        assert_eq!(
            cache.state(Timeframe::Today, Personality::Default),
            &SummaryState::Ready("Sunny.".to_string())
        );
        assert_eq!(cache.try_begin(Timeframe::Today, Personality::Default), None);

        cache.invalidate_all();
        assert_eq!(
            cache.state(Timeframe::Today, Personality::Default),
            &SummaryState::Absent
        );
        assert_eq!(
            cache.try_begin(Timeframe::Today, Personality::Default),
            Some(1)
        );
    }

    #[test]
    fn stale_commits_are_dropped() {
        let mut cache = SummaryCache::new();
        let epoch = cache.try_begin(Timeframe::Week, Personality::Default).unwrap();

        cache.invalidate_all();
        cache.commit_ready(Timeframe::Week, Personality::Default, epoch, "old".into());

        assert_eq!(
            cache.state(Timeframe::Week, Personality::Default),
            &SummaryState::Absent
        );
    }

    #[test]
    fn fallback_commits_are_epoch_guarded_too() {
        let mut cache = SummaryCache::new();
        let epoch = cache.try_begin(Timeframe::Now, Personality::Default).unwrap();
        cache.commit_fallback(Timeframe::Now, Personality::Default, epoch, "72°F.".into());

        assert_eq!(
            cache.state(Timeframe::Now, Personality::Default),
            &SummaryState::Fallback("72°F.".to_string())
        );
    }

    #[test]
    fn fallback_text_reads_from_the_derived_window() {
        let payload = ForecastPayload {
            currently: CurrentConditions {
                summary: "Clear".to_string(),
                temperature: 71.6,
                apparent_temperature: 70.0,
                ..CurrentConditions::default()
            },
            ..ForecastPayload::default()
        };
        let now = NaiveDate::from_ymd_opt(2026, 8, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let text = fallback_text(&payload, Timeframe::Now, now);
        assert_eq!(text, "Clear, 72°F. Feels like 70°F.");
    }

    #[test]
    fn fallback_text_for_empty_payload_is_stable() {
        let payload = ForecastPayload::default();
        let now = NaiveDate::from_ymd_opt(2026, 8, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let text = fallback_text(&payload, Timeframe::Week, now);
        assert_eq!(text, "Weather details are unavailable right now.");
    }
}
