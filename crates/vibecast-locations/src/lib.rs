//! Locations for Vibecast: geocoding, device position, debounced search,
//! and persisted location preferences.

pub mod device;
pub mod geocode;
pub mod resolver;
pub mod store;
pub mod types;

pub use device::{
    fetch_current_location, DevicePositioner, LocationError, UnavailablePositioner, FIX_MAX_AGE,
    FIX_TIMEOUT,
};
pub use geocode::{Address, Coordinates, GeocodeError, Geocoder, NominatimGeocoder};
pub use resolver::{AddLocationError, LocationResolver, SearchEvent};
pub use store::{
    JsonFileStore, KeyValueStore, PreferenceStore, StoreError, DEFAULT_PERSONALITY_ID,
};
pub use types::{Location, LocationKind, SearchResult, CURRENT_LOCATION_ID};
