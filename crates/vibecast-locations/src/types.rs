//! Location data model.

use serde::{Deserialize, Serialize};

/// Reserved id of the device-derived location slot. Saved-location ids are
/// millisecond timestamps and never collide with it.
pub const CURRENT_LOCATION_ID: &str = "current";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// The single device-GPS slot; mutated by location refresh.
    Current,
    /// A user-added location; immutable once created, deletable.
    Zipcode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
}

impl Location {
    /// The device location slot. Always carries the reserved id.
    pub fn current(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            id: CURRENT_LOCATION_ID.to_string(),
            kind: LocationKind::Current,
            name: name.to_string(),
            latitude,
            longitude,
            zipcode: None,
        }
    }

    /// A user-added location with a fresh timestamp-based id.
    pub fn saved(name: &str, zipcode: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            id: chrono::Utc::now().timestamp_millis().to_string(),
            kind: LocationKind::Zipcode,
            name: name.to_string(),
            latitude,
            longitude,
            zipcode: Some(zipcode.to_string()),
        }
    }
}

/// A single candidate produced by free-text search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub zipcode: String,
    pub latitude: f64,
    pub longitude: f64,
}
