//! The persisted base-id record and its age policy.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::ports::KeyValueStore;

/// Storage key holding the base-id record.
pub const BASE_CID_STORAGE_KEY: &str = "cid-base";

/// Records older than this are treated as absent.
#[must_use]
pub fn max_age() -> Duration {
    Duration::days(365)
}

/// Minimum elapsed time between timestamp refreshes of a stored record.
#[must_use]
pub fn refresh_cadence() -> Duration {
    Duration::hours(24)
}

/// The durable base identifier, stored as `{"time": <epoch-ms>, "cid": <string>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseCidRecord {
    /// The base identifier.
    #[serde(rename = "cid")]
    pub value: String,
    /// When the record was created or last refreshed.
    #[serde(rename = "time", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl BaseCidRecord {
    /// A record for `value` stamped at `now`.
    #[must_use]
    pub fn new(value: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self { value: value.into(), created_at: now }
    }

    /// Age of the record at `now`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// `true` once the record is older than [`max_age`].
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > max_age()
    }

    /// `true` once the timestamp is older than [`refresh_cadence`].
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > refresh_cadence()
    }
}

/// Reads the record, distinguishing "absent" from a storage fault.
///
/// # Errors
///
/// Returns an error if the store fails or the stored JSON is malformed.
pub fn read_record(store: &dyn KeyValueStore) -> Result<Option<BaseCidRecord>, StorageError> {
    store
        .get(BASE_CID_STORAGE_KEY)?
        .map(|raw| serde_json::from_str(&raw).map_err(|e| StorageError::Malformed(e.to_string())))
        .transpose()
}

/// Writes the record.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn write_record(store: &dyn KeyValueStore, record: &BaseCidRecord) -> Result<(), StorageError> {
    let json = serde_json::to_string(record).map_err(|e| StorageError::Malformed(e.to_string()))?;
    store.set(BASE_CID_STORAGE_KEY, &json)
}

/// Returns the stored record if present and unexpired at `now`.
///
/// Storage faults and malformed records collapse to `None` here; this is the
/// single place where the base-id path decides a fault means "absent".
pub fn load_valid(store: &dyn KeyValueStore, now: DateTime<Utc>) -> Option<BaseCidRecord> {
    match read_record(store) {
        Ok(Some(record)) if record.is_expired(now) => {
            debug!(age_days = record.age(now).num_days(), "stored base cid expired");
            None
        }
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "base cid store unreadable; treating as absent");
            None
        }
    }
}

/// Writes the record, logging and discarding any failure.
pub fn store_quietly(store: &dyn KeyValueStore, record: &BaseCidRecord) {
    if let Err(e) = write_record(store, record) {
        warn!(error = %e, "failed to persist base cid");
    }
}
