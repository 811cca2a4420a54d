//! File-backed key/value store: one JSON object per store directory.

use std::path::{Path, PathBuf};

use super::json_file;
use crate::error::StorageError;
use crate::ports::KeyValueStore;

/// Key/value store persisted as `<dir>/storage.json`.
///
/// Every call reads the file afresh, so two processes sharing a directory
/// observe each other's writes (last write wins). A corrupt file reads as an
/// error but is replaced by the next write.
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self { path: dir.join("storage.json") }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(json_file::load::<String>(&self.path)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = json_file::load_for_update::<String>(&self.path)?;
        entries.insert(key.to_string(), value.to_string());
        json_file::save(&self.path, &entries)
    }
}
