//! Deterministic entropy for tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::EntropyError;
use crate::ports::EntropySource;

#[derive(Default)]
struct Inner {
    counter: AtomicU64,
    strong_unavailable: AtomicBool,
}

/// Produces a fresh counter value on every draw, so each generated
/// identifier differs while runs stay reproducible.
#[derive(Clone, Default)]
pub struct CountingEntropy {
    inner: Arc<Inner>,
}

impl CountingEntropy {
    /// Simulates a platform with no strong random source.
    pub fn disable_strong(&self) {
        self.inner.strong_unavailable.store(true, Ordering::SeqCst);
    }

    /// Number of draws served so far (strong and weak).
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.inner.counter.load(Ordering::SeqCst)
    }

    fn next(&self) -> u64 {
        self.inner.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl EntropySource for CountingEntropy {
    fn fill_strong(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        if self.inner.strong_unavailable.load(Ordering::SeqCst) {
            return Err(EntropyError("disabled".into()));
        }
        let n = self.next().to_le_bytes();
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = n[i % n.len()];
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn pseudo_random(&self) -> f64 {
        let n = self.next();
        (n % 1000) as f64 / 1000.0
    }
}
