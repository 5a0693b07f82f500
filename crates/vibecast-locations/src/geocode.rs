//! Geocoding abstraction plus a Nominatim (OpenStreetMap) implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Vibecast/0.1.0 (https://github.com/vibecast)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Structured address pieces from reverse geocoding.
#[derive(Debug, Clone, Default)]
pub struct Address {
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub name: Option<String>,
}

impl Address {
    /// "City, Region" when both are known, the place name otherwise,
    /// `fallback` as a last resort.
    pub fn display_name(&self, fallback: &str) -> String {
        match (&self.city, &self.region) {
            (Some(city), Some(region)) => format!("{}, {}", city, region),
            _ => self
                .name
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No results found")]
    NotFound,

    #[error("Geocoding network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Geocoding service error: {0}")]
    Service(String),
}

/// Free-text and coordinate resolution capability.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free text to candidate coordinates.
    async fn resolve_text(&self, query: &str) -> Result<Vec<Coordinates>, GeocodeError>;

    /// Resolve coordinates to a structured address.
    async fn resolve_coordinates(&self, latitude: f64, longitude: f64)
        -> Result<Address, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct NominatimSearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    address: Option<NominatimAddress>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    county: Option<String>,
    postcode: Option<String>,
    road: Option<String>,
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new() -> Result<Self, GeocodeError> {
        Self::new_with_base_url(NOMINATIM_URL)
    }

    pub fn new_with_base_url(base_url: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve_text(&self, query: &str) -> Result<Vec<Coordinates>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "5")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Service(format!(
                "search returned status {}",
                response.status()
            )));
        }

        let hits: Vec<NominatimSearchHit> = response.json().await?;
        let coords: Vec<Coordinates> = hits
            .iter()
            .filter_map(|hit| {
                let latitude = hit.lat.parse().ok()?;
                let longitude = hit.lon.parse().ok()?;
                Some(Coordinates { latitude, longitude })
            })
            .collect();

        tracing::debug!(query, candidates = coords.len(), "Geocode search complete");
        Ok(coords)
    }

    async fn resolve_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Address, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Service(format!(
                "reverse returned status {}",
                response.status()
            )));
        }

        let body: NominatimReverse = response.json().await?;
        let Some(addr) = body.address else {
            return Err(GeocodeError::NotFound);
        };

        Ok(Address {
            city: addr
                .city
                .or(addr.town)
                .or(addr.village)
                .or(addr.municipality)
                .or(addr.county),
            region: addr.state,
            postal_code: addr.postcode,
            street: addr.road,
            name: body.display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_city_and_region() {
        let addr = Address {
            city: Some("Seattle".to_string()),
            region: Some("Washington".to_string()),
            ..Address::default()
        };
        assert_eq!(addr.display_name("fallback"), "Seattle, Washington");
    }

    #[test]
    fn display_name_falls_back_to_place_then_query() {
        let addr = Address {
            name: Some("Pike Place Market".to_string()),
            ..Address::default()
        };
        assert_eq!(addr.display_name("fallback"), "Pike Place Market");

        let empty = Address::default();
        assert_eq!(empty.display_name("98101"), "98101");
    }
}
