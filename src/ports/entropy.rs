//! Entropy port supplying seed material for new identifiers.

use crate::error::EntropyError;

/// A cryptographically strong randomness source.
pub trait EntropySource: Send + Sync {
    /// Fills `dest` with strong random bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when no strong source is available; callers fall
    /// back to weak composite entropy.
    fn fill_strong(&self, dest: &mut [u8]) -> Result<(), EntropyError>;

    /// Returns a pseudo-random number in `[0, 1)` for the weak fallback.
    fn pseudo_random(&self) -> f64;
}
