//! Device-local persistence.
//!
//! [`LocalStorage`] is the raw string item store. [`JsonStorage`] layers
//! JSON values on top of it and [`SessionStore`] owns the session identifier.

mod file;
mod memory;
mod session;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use session::{SessionStore, SESSION_KEY};

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

use crate::error::StorageError;

/// Key the device-only preferences are stored under.
pub const LOCAL_SETTING_KEY: &str = "localSetting";

pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON view over a [`LocalStorage`].
#[derive(Clone)]
pub struct JsonStorage {
    backend: Arc<dyn LocalStorage>,
}

impl JsonStorage {
    pub fn new(backend: Arc<dyn LocalStorage>) -> Self {
        Self { backend }
    }

    /// Read `keys` into a partial object. Keys that are missing, unreadable or
    /// hold invalid JSON are left out.
    pub fn get(&self, keys: &[&str]) -> Map<String, Value> {
        let mut data = Map::new();
        for &key in keys {
            let raw = match self.backend.get_item(key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key, error = %e, "Failed to read from storage");
                    continue;
                }
            };
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    data.insert(key.to_string(), value);
                }
                Err(e) => warn!(key, error = %e, "Stored value is not valid JSON"),
            }
        }
        data
    }

    /// Write every entry of `data`, each under its own key.
    pub fn set(&self, data: &Map<String, Value>) -> Result<(), StorageError> {
        for (key, value) in data {
            let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
                key: key.clone(),
                source,
            })?;
            self.backend.set_item(key, &encoded)?;
        }
        Ok(())
    }

    pub fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.backend.remove_item(key)?;
        }
        Ok(())
    }
}
