//! Per-document service context bundling all port trait objects.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::cookies::FileCookieJar;
use crate::adapters::live::entropy::OsEntropy;
use crate::adapters::live::hasher::Sha384Hasher;
use crate::adapters::live::storage::FileKeyValueStore;
use crate::config::CidConfig;
use crate::origin::OriginClassifier;
use crate::ports::bridge::HostBridge;
use crate::ports::clock::Clock;
use crate::ports::cookies::CookieStore;
use crate::ports::entropy::EntropySource;
use crate::ports::hasher::CidHasher;
use crate::ports::storage::KeyValueStore;

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// The document identifiers are resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The document's own URL (a proxy URL when proxy-served).
    pub url: Url,
    /// Current viewport.
    pub viewport: Viewport,
}

impl Document {
    /// A document at `url` with the default viewport.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { url, viewport: Viewport::default() }
    }
}

/// Bundles all port trait objects for one document.
///
/// Built once per document and shared by reference (behind an `Arc`, since
/// persistence tasks outlive the call that spawned them).
pub struct ServiceContext {
    /// Clock for record age and cookie expiry.
    pub clock: Box<dyn Clock>,
    /// Durable key/value storage for the base-id record.
    pub store: Box<dyn KeyValueStore>,
    /// Cookie jar for scope fallback identifiers.
    pub cookies: Box<dyn CookieStore>,
    /// Strong randomness for new identifiers.
    pub entropy: Box<dyn EntropySource>,
    /// Hash used for synthesis and derivation.
    pub hasher: Box<dyn CidHasher>,
    /// Channel to an embedding host, if any.
    pub bridge: Box<dyn HostBridge>,
    /// Proxy origin rules.
    pub classifier: OriginClassifier,
    /// The document being served.
    pub document: Document,
}

impl ServiceContext {
    /// Creates a live context whose storage and cookies live under the
    /// configured store directory.
    #[must_use]
    pub fn live(config: &CidConfig, document: Document, bridge: Box<dyn HostBridge>) -> Self {
        Self::live_at(&config.store_dir, config.classifier(), document, bridge)
    }

    /// Creates a live context rooted at an explicit directory.
    #[must_use]
    pub fn live_at(
        dir: &Path,
        classifier: OriginClassifier,
        document: Document,
        bridge: Box<dyn HostBridge>,
    ) -> Self {
        Self {
            clock: Box::new(LiveClock),
            store: Box::new(FileKeyValueStore::new(dir)),
            cookies: Box::new(FileCookieJar::new(dir)),
            entropy: Box::new(OsEntropy),
            hasher: Box::new(Sha384Hasher),
            bridge,
            classifier,
            document,
        }
    }

    /// Returns `true` when the document is proxy-served.
    #[must_use]
    pub fn is_proxy_document(&self) -> bool {
        self.classifier.is_proxy_origin(&self.document.url)
    }
}
