//! Seed material for new identifiers.

use tracing::warn;

use crate::context::ServiceContext;
use crate::ports::CidHasher;

/// Bytes drawn from the strong source.
pub const STRONG_ENTROPY_BYTES: usize = 16;

/// Seed material. Never used raw: callers go through [`EntropyMaterial::hashed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntropyMaterial {
    /// 128 bits from a cryptographically strong source.
    Strong([u8; STRONG_ENTROPY_BYTES]),
    /// Low-entropy composite of document URL, clock, a pseudo-random number
    /// and viewport size. Guessable; only used without a strong source.
    Weak(String),
}

impl EntropyMaterial {
    /// Hashes the material into identifier form.
    #[must_use]
    pub fn hashed(&self, hasher: &dyn CidHasher) -> String {
        match self {
            Self::Strong(bytes) => hasher.hash_bytes(bytes),
            Self::Weak(composite) => hasher.hash_str(composite),
        }
    }

    /// `true` for material from the strong source.
    #[must_use]
    pub fn is_strong(&self) -> bool {
        matches!(self, Self::Strong(_))
    }
}

/// Draws fresh entropy, falling back to the weak composite when the strong
/// source is unavailable.
pub fn draw(ctx: &ServiceContext) -> EntropyMaterial {
    let mut bytes = [0u8; STRONG_ENTROPY_BYTES];
    match ctx.entropy.fill_strong(&mut bytes) {
        Ok(()) => EntropyMaterial::Strong(bytes),
        Err(e) => {
            warn!(error = %e, "falling back to weak entropy");
            let viewport = ctx.document.viewport;
            EntropyMaterial::Weak(format!(
                "{}{}{}{}{}",
                ctx.document.url,
                ctx.clock.now().timestamp_millis(),
                ctx.entropy.pseudo_random(),
                viewport.width,
                viewport.height,
            ))
        }
    }
}
