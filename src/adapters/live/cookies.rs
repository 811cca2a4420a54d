//! File-backed cookie jar.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::LiveClock;
use super::json_file;
use crate::error::StorageError;
use crate::ports::{Clock, CookieOptions, CookieStore};

/// One persisted cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    /// Cookie value.
    pub value: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Whether the cookie was bound to the broadest usable domain.
    pub highest_available_domain: bool,
}

/// Cookie jar persisted as `<dir>/cookies.json`. Expired cookies read as unset.
pub struct FileCookieJar {
    path: PathBuf,
    clock: Box<dyn Clock>,
}

impl FileCookieJar {
    /// Creates a jar rooted at `dir` that expires cookies by the system clock.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self::with_clock(dir, Box::new(LiveClock))
    }

    /// Creates a jar rooted at `dir` that expires cookies by `clock`.
    #[must_use]
    pub fn with_clock(dir: &Path, clock: Box<dyn Clock>) -> Self {
        Self { path: dir.join("cookies.json"), clock }
    }

    /// Returns every cookie still live at the jar's current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the jar file cannot be read or parsed.
    pub fn entries(&self) -> Result<BTreeMap<String, StoredCookie>, StorageError> {
        self.entries_at(self.clock.now())
    }

    /// Returns every cookie that expires after `now`, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the jar file cannot be read or parsed.
    pub fn entries_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<String, StoredCookie>, StorageError> {
        let mut cookies: BTreeMap<String, StoredCookie> = json_file::load(&self.path)?;
        cookies.retain(|_, cookie| cookie.expires_at > now);
        Ok(cookies)
    }
}

impl CookieStore for FileCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.remove(name).map(|cookie| cookie.value))
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
        options: CookieOptions,
    ) -> Result<(), StorageError> {
        let mut cookies = json_file::load_for_update::<StoredCookie>(&self.path)?;
        cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
                highest_available_domain: options.highest_available_domain,
            },
        );
        json_file::save(&self.path, &cookies)
    }
}
