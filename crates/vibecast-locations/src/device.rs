//! Device position capability and the current-location pipeline.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::geocode::{Coordinates, Geocoder};
use crate::types::Location;

/// Hard timeout for a position fix.
pub const FIX_TIMEOUT: Duration = Duration::from_secs(20);
/// Oldest acceptable cached fix.
pub const FIX_MAX_AGE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Error)]
pub enum LocationError {
    #[error("Location services are disabled")]
    ServicesDisabled,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location request timed out")]
    Timeout,

    #[error("Location service unavailable")]
    Unavailable,
}

impl LocationError {
    /// Distinct, actionable alert text per failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::ServicesDisabled => {
                "Location services are turned off. Enable them in system settings."
            }
            LocationError::PermissionDenied => {
                "Location permission was denied. Allow access to use your current location."
            }
            LocationError::Timeout => {
                "Finding your location took too long. Please try again."
            }
            LocationError::Unavailable => {
                "Your location could not be determined. Please try again later."
            }
        }
    }
}

/// Platform position source. Implementations apply the balanced-accuracy
/// and max-age policy; `fetch_current_location` enforces the hard timeout.
#[async_trait]
pub trait DevicePositioner: Send + Sync {
    async fn services_enabled(&self) -> bool;

    async fn request_permission(&self) -> bool;

    /// One position fix no older than `max_age`.
    async fn current_position(&self, max_age: Duration) -> Result<Coordinates, LocationError>;
}

/// Resolve the device position into the `current` location slot.
///
/// Coordinates are never discarded because naming failed: a reverse-geocode
/// failure falls back to the name "Current Location".
pub async fn fetch_current_location(
    positioner: &dyn DevicePositioner,
    geocoder: &dyn Geocoder,
) -> Result<Location, LocationError> {
    if !positioner.services_enabled().await {
        return Err(LocationError::ServicesDisabled);
    }
    if !positioner.request_permission().await {
        return Err(LocationError::PermissionDenied);
    }

    let coords = tokio::time::timeout(FIX_TIMEOUT, positioner.current_position(FIX_MAX_AGE))
        .await
        .map_err(|_| LocationError::Timeout)??;

    let name = match geocoder
        .resolve_coordinates(coords.latitude, coords.longitude)
        .await
    {
        Ok(address) => address.display_name("Current Location"),
        Err(e) => {
            tracing::warn!("Reverse geocode of current position failed: {}", e);
            "Current Location".to_string()
        }
    };

    tracing::info!(
        latitude = coords.latitude,
        longitude = coords.longitude,
        %name,
        "Resolved current location"
    );
    Ok(Location::current(&name, coords.latitude, coords.longitude))
}

/// Positioner for hosts with no location hardware; always unavailable.
pub struct UnavailablePositioner;

#[async_trait]
impl DevicePositioner for UnavailablePositioner {
    async fn services_enabled(&self) -> bool {
        false
    }

    async fn request_permission(&self) -> bool {
        false
    }

    async fn current_position(&self, _max_age: Duration) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{Address, GeocodeError};
    use crate::types::CURRENT_LOCATION_ID;

    struct FixedPositioner {
        enabled: bool,
        permitted: bool,
        coords: Coordinates,
    }

    #[async_trait]
    impl DevicePositioner for FixedPositioner {
        async fn services_enabled(&self) -> bool {
            self.enabled
        }
        async fn request_permission(&self) -> bool {
            self.permitted
        }
        async fn current_position(&self, _max_age: Duration) -> Result<Coordinates, LocationError> {
            Ok(self.coords)
        }
    }

    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn resolve_text(&self, _query: &str) -> Result<Vec<Coordinates>, GeocodeError> {
            Err(GeocodeError::NotFound)
        }
        async fn resolve_coordinates(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Address, GeocodeError> {
            Err(GeocodeError::NotFound)
        }
    }

    struct NamingGeocoder;

    #[async_trait]
    impl Geocoder for NamingGeocoder {
        async fn resolve_text(&self, _query: &str) -> Result<Vec<Coordinates>, GeocodeError> {
            Ok(vec![])
        }
        async fn resolve_coordinates(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Address, GeocodeError> {
            Ok(Address {
                city: Some("Seattle".to_string()),
                region: Some("WA".to_string()),
                ..Address::default()
            })
        }
    }

    #[tokio::test]
    async fn disabled_services_is_a_distinct_error() {
        let positioner = FixedPositioner {
            enabled: false,
            permitted: true,
            coords: Coordinates { latitude: 0.0, longitude: 0.0 },
        };
        let err = fetch_current_location(&positioner, &NamingGeocoder)
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::ServicesDisabled));
    }

    #[tokio::test]
    async fn denied_permission_is_a_distinct_error() {
        let positioner = FixedPositioner {
            enabled: true,
            permitted: false,
            coords: Coordinates { latitude: 0.0, longitude: 0.0 },
        };
        let err = fetch_current_location(&positioner, &NamingGeocoder)
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn reverse_geocode_failure_keeps_the_coordinates() {
        let positioner = FixedPositioner {
            enabled: true,
            permitted: true,
            coords: Coordinates { latitude: 47.6, longitude: -122.3 },
        };
        let loc = fetch_current_location(&positioner, &FailingGeocoder)
            .await
            .unwrap();
        assert_eq!(loc.id, CURRENT_LOCATION_ID);
        assert_eq!(loc.name, "Current Location");
        assert_eq!(loc.latitude, 47.6);
    }

    #[tokio::test]
    async fn named_fix_lands_in_the_current_slot() {
        let positioner = FixedPositioner {
            enabled: true,
            permitted: true,
            coords: Coordinates { latitude: 47.6, longitude: -122.3 },
        };
        let loc = fetch_current_location(&positioner, &NamingGeocoder)
            .await
            .unwrap();
        assert_eq!(loc.name, "Seattle, WA");
        assert_eq!(loc.id, CURRENT_LOCATION_ID);
    }

    #[test]
    fn error_messages_are_distinct() {
        let messages = [
            LocationError::ServicesDisabled.user_message(),
            LocationError::PermissionDenied.user_message(),
            LocationError::Timeout.user_message(),
            LocationError::Unavailable.user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
