//! In-memory cookie jar.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::ports::{CookieOptions, CookieStore};

/// A cookie as last written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieWrite {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Requested expiry.
    pub expires_at: DateTime<Utc>,
    /// Requested placement.
    pub options: CookieOptions,
}

#[derive(Default)]
struct Inner {
    jar: Mutex<HashMap<String, CookieWrite>>,
    writes: Mutex<Vec<CookieWrite>>,
    fail: AtomicBool,
}

/// Shared in-memory cookie jar. Expiry is recorded but not enforced.
#[derive(Clone, Default)]
pub struct MemoryCookieJar {
    inner: Arc<Inner>,
}

impl MemoryCookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a cookie without counting it as a write.
    pub fn insert(&self, name: &str, value: &str, expires_at: DateTime<Utc>) {
        self.inner.jar.lock().expect("jar lock poisoned").insert(
            name.to_string(),
            CookieWrite {
                name: name.to_string(),
                value: value.to_string(),
                expires_at,
                options: CookieOptions::default(),
            },
        );
    }

    /// The current cookie named `name`, if any.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<CookieWrite> {
        self.inner.jar.lock().expect("jar lock poisoned").get(name).cloned()
    }

    /// Number of cookies in the jar.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.jar.lock().expect("jar lock poisoned").len()
    }

    /// Returns `true` when the jar holds no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every successful `set` so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<CookieWrite> {
        self.inner.writes.lock().expect("jar lock poisoned").clone()
    }

    /// Makes every subsequent read and write fail.
    pub fn fail(&self, fail: bool) {
        self.inner.fail.store(fail, Ordering::SeqCst);
    }
}

impl CookieStore for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("cookies disabled".into()));
        }
        Ok(self.cookie(name).map(|c| c.value))
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
        options: CookieOptions,
    ) -> Result<(), StorageError> {
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("cookies disabled".into()));
        }
        let write = CookieWrite {
            name: name.to_string(),
            value: value.to_string(),
            expires_at,
            options,
        };
        self.inner.jar.lock().expect("jar lock poisoned").insert(name.to_string(), write.clone());
        self.inner.writes.lock().expect("jar lock poisoned").push(write);
        Ok(())
    }
}
