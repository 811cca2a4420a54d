//! JSON-object files shared by the file-backed store and cookie jar.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StorageError;

/// Reads the map at `path`; a missing file is an empty map.
pub(crate) fn load<T: DeserializeOwned>(
    path: &Path,
) -> Result<BTreeMap<String, T>, StorageError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| StorageError::Malformed(e.to_string()))
}

/// Reads the map for a read-modify-write. A malformed file starts over empty
/// so the following [`save`] replaces it.
pub(crate) fn load_for_update<T: DeserializeOwned>(
    path: &Path,
) -> Result<BTreeMap<String, T>, StorageError> {
    match load(path) {
        Err(StorageError::Malformed(reason)) => {
            warn!(path = %path.display(), %reason, "discarding malformed file");
            Ok(BTreeMap::new())
        }
        other => other,
    }
}

/// Writes the map to a sibling temp file and renames it over `path`.
pub(crate) fn save<T: Serialize>(
    path: &Path,
    entries: &BTreeMap<String, T>,
) -> Result<(), StorageError> {
    let json =
        serde_json::to_string_pretty(entries).map_err(|e| StorageError::Malformed(e.to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, json)?;
    Ok(std::fs::rename(&staging, path)?)
}
