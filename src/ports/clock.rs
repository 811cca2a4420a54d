//! Clock port for obtaining the current time.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Record age and cookie expiry are computed against this clock, so tests
/// substitute a fixed or steppable one to cross the 24h and 365d boundaries.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
