//! Key/value storage port backing the base-id record and the opt-out flag.

use crate::error::StorageError;

/// Durable string key/value storage.
///
/// Each call is assumed to be serialized by the implementation, but a `get`
/// followed by a `set` is not atomic.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error when the store is disabled or unreadable.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the write is rejected (quota, disabled storage).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
