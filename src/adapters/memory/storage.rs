//! In-memory key/value store with write accounting and fault injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::StorageError;
use crate::ports::KeyValueStore;

#[derive(Default)]
struct Inner {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

/// Shared in-memory store. Clones observe the same entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` without counting it as a write.
    pub fn insert(&self, key: &str, value: &str) {
        self.inner.entries.lock().expect("store lock poisoned").insert(key.into(), value.into());
    }

    /// Current value of `key`, bypassing fault injection.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    /// Every successful `set` so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.inner.writes.lock().expect("store lock poisoned").clone()
    }

    /// Makes every subsequent `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` fail with a quota error.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".into()));
        }
        Ok(self.peek(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded);
        }
        self.insert(key, value);
        self.inner
            .writes
            .lock()
            .expect("store lock poisoned")
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}
