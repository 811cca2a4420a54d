//! Manually advanced clock.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::ports::Clock;

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct SteppingClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl SteppingClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).single().unwrap_or_default())
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}
