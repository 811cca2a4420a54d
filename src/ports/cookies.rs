//! Cookie port for the per-scope fallback identifiers.

use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// Placement options for a cookie write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CookieOptions {
    /// Bind the cookie to the broadest domain the document may write
    /// (e.g. `example.com` rather than `www.example.com`).
    pub highest_available_domain: bool,
}

/// Reads and writes cookies for the current document.
pub trait CookieStore: Send + Sync {
    /// Returns the value of the cookie `name`, or `None` when unset or expired.
    ///
    /// # Errors
    ///
    /// Returns an error when cookies cannot be read.
    fn get(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Sets `name` to `value`, expiring at `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns an error when the cookie cannot be written.
    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
        options: CookieOptions,
    ) -> Result<(), StorageError>;
}
