use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use super::LocalStorage;
use crate::error::StorageError;

/// Storage backed by a single JSON object file.
///
/// The whole file is read once on open and rewritten on every change via a
/// temporary file and rename, so readers never see a half-written file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = load_items(&path)?;
        debug!(path = %path.display(), entries = items.len(), "Opened file storage");
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy and keep it only once the file has been written.
    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        let mut next = items.clone();
        f(&mut next);
        save_items(&self.path, &next)?;
        *items = next;
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn load_items(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
        path: path.display().to_string(),
        source,
    })
}

fn save_items(path: &Path, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let contents = serde_json::to_string_pretty(items).map_err(|source| StorageError::Encode {
        key: path.display().to_string(),
        source,
    })?;

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents).map_err(|e| io_error(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| io_error(path, e))?;
    Ok(())
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.update(|items| {
            items.remove(key);
        })
    }
}
