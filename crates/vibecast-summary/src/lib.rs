//! AI-generated weather summaries for Vibecast.
//!
//! A personality-toned prompt per timeframe, a chat-completions client, and
//! a per-(timeframe, personality) cache with in-flight de-duplication and
//! a deterministic local fallback.

pub mod cache;
pub mod client;
pub mod personality;
pub mod prompt;

pub use cache::{fallback_text, SummaryCache, SummaryState};
pub use client::{ChatMessage, SummaryClient, SummaryError};
pub use personality::Personality;
pub use prompt::{build_messages, system_message, timeframe_prompt};
