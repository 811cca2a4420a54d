//! Delegated-origin bridge port: a base id owned by the embedding host.

use std::future::Future;
use std::pin::Pin;

/// Boxed future type alias used by [`HostBridge`] to keep the trait dyn-compatible.
pub type BridgeFuture<'a> = Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;

/// Channel to a host viewer that embeds proxy-served documents.
///
/// When the document is embedded, the host's identifier is authoritative
/// and this crate never persists a base id of its own.
pub trait HostBridge: Send + Sync {
    /// Returns `true` when the document is embedded by a delegated host.
    fn is_embedded(&self) -> bool;

    /// Asks the host for its base id. `None` means the host has none to give.
    fn get_base_cid(&self) -> BridgeFuture<'_>;
}
