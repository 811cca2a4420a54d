//! In-memory adapters for tests and embedding.
//!
//! Every adapter is a cheap `Clone` over shared state, so a test can hand one
//! copy to a [`ServiceContext`] and keep another to inspect writes, inject
//! storage faults, or move the clock.

pub mod bridge;
pub mod clock;
pub mod cookies;
pub mod entropy;
pub mod storage;

pub use bridge::ScriptedBridge;
pub use clock::SteppingClock;
pub use cookies::MemoryCookieJar;
pub use entropy::CountingEntropy;
pub use storage::MemoryStore;

use std::sync::Arc;

use crate::adapters::live::hasher::Sha384Hasher;
use crate::context::{Document, ServiceContext};
use crate::origin::OriginClassifier;

/// Handles onto one set of in-memory adapters.
///
/// Several contexts built from the same harness share storage and cookies,
/// which is how tests model two documents open in the same browser profile.
#[derive(Clone, Default)]
pub struct MemoryHarness {
    /// Shared key/value store.
    pub store: MemoryStore,
    /// Shared cookie jar.
    pub cookies: MemoryCookieJar,
    /// Shared clock.
    pub clock: SteppingClock,
    /// Shared entropy source.
    pub entropy: CountingEntropy,
    /// Shared host bridge.
    pub bridge: ScriptedBridge,
}

impl MemoryHarness {
    /// Creates a harness with empty storage and a clock frozen at
    /// 2024-06-15T10:30:00Z.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context for `document` on top of this harness.
    #[must_use]
    pub fn context(&self, document: Document) -> Arc<ServiceContext> {
        Arc::new(ServiceContext {
            clock: Box::new(self.clock.clone()),
            store: Box::new(self.store.clone()),
            cookies: Box::new(self.cookies.clone()),
            entropy: Box::new(self.entropy.clone()),
            hasher: Box::new(Sha384Hasher),
            bridge: Box::new(self.bridge.clone()),
            classifier: OriginClassifier::default(),
            document,
        })
    }
}
