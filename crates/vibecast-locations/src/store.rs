//! Persisted user preferences over an abstract string-keyed JSON store.
//!
//! Persistence failures are logged and swallowed: missing or unreadable
//! data must never block startup, so every load falls back to a default.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::types::{Location, LocationKind};

const KEY_SAVED_LOCATIONS: &str = "saved_locations";
const KEY_SELECTED_PERSONALITY: &str = "selected_personality";
const KEY_LAST_SELECTED_LOCATION: &str = "last_selected_location";

/// Fallback personality id when nothing is persisted.
pub const DEFAULT_PERSONALITY_ID: &str = "default";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Abstract durable store of string-keyed JSON blobs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// File-per-key store under a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Typed preference access for the session layer.
#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saved locations, deduplicated by id, insertion order preserved.
    /// The current-location slot is never part of this list.
    pub fn load_locations(&self) -> Vec<Location> {
        let loaded: Vec<Location> = match self.store.get(KEY_SAVED_LOCATIONS) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable saved locations: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Error loading saved locations: {}", e);
                Vec::new()
            }
        };

        let mut seen = std::collections::HashSet::new();
        loaded
            .into_iter()
            .filter(|loc| loc.kind == LocationKind::Zipcode && seen.insert(loc.id.clone()))
            .collect()
    }

    pub fn save_locations(&self, locations: &[Location]) {
        match serde_json::to_string(locations) {
            Ok(json) => {
                if let Err(e) = self.store.set(KEY_SAVED_LOCATIONS, &json) {
                    tracing::warn!("Error saving locations: {}", e);
                } else {
                    tracing::debug!(count = locations.len(), "Locations saved");
                }
            }
            Err(e) => tracing::warn!("Error serializing locations: {}", e),
        }
    }

    pub fn load_personality(&self) -> String {
        match self.store.get(KEY_SELECTED_PERSONALITY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable personality: {}", e);
                DEFAULT_PERSONALITY_ID.to_string()
            }),
            Ok(None) => DEFAULT_PERSONALITY_ID.to_string(),
            Err(e) => {
                tracing::warn!("Error loading personality: {}", e);
                DEFAULT_PERSONALITY_ID.to_string()
            }
        }
    }

    pub fn save_personality(&self, personality_id: &str) {
        match serde_json::to_string(personality_id) {
            Ok(json) => {
                if let Err(e) = self.store.set(KEY_SELECTED_PERSONALITY, &json) {
                    tracing::warn!("Error saving personality: {}", e);
                }
            }
            Err(e) => tracing::warn!("Error serializing personality: {}", e),
        }
    }

    pub fn load_last_selected(&self) -> Option<Location> {
        match self.store.get(KEY_LAST_SELECTED_LOCATION) {
            Ok(Some(json)) => serde_json::from_str(&json)
                .map_err(|e| tracing::warn!("Ignoring unreadable last-selected location: {}", e))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Error loading last-selected location: {}", e);
                None
            }
        }
    }

    pub fn save_last_selected(&self, location: &Location) {
        match serde_json::to_string(location) {
            Ok(json) => {
                if let Err(e) = self.store.set(KEY_LAST_SELECTED_LOCATION, &json) {
                    tracing::warn!("Error saving last-selected location: {}", e);
                }
            }
            Err(e) => tracing::warn!("Error serializing last-selected location: {}", e),
        }
    }

    pub fn clear_last_selected(&self) {
        if let Err(e) = self.store.remove(KEY_LAST_SELECTED_LOCATION) {
            tracing::warn!("Error clearing last-selected location: {}", e);
        }
    }
}
