use dashmap::DashMap;

use super::LocalStorage;
use crate::error::StorageError;

/// Process-local storage. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}
