//! Live entropy adapter backed by the operating system RNG.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use crate::error::EntropyError;
use crate::ports::EntropySource;

/// Strong randomness from the OS, pseudo-randomness from the thread RNG.
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_strong(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(dest).map_err(|e| EntropyError(e.to_string()))
    }

    fn pseudo_random(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}
