//! Live host bridge with a fixed answer.
//!
//! A process has no real embedding viewer, so the CLI describes the host
//! up front: either detached, or embedded with the id the host would hand out.

use crate::ports::bridge::{BridgeFuture, HostBridge};

/// Host bridge whose embedding state and answer are fixed at construction.
pub struct StaticHostBridge {
    embedded: bool,
    cid: Option<String>,
}

impl StaticHostBridge {
    /// A document that is not embedded by any host.
    #[must_use]
    pub fn detached() -> Self {
        Self { embedded: false, cid: None }
    }

    /// A document embedded by a host that answers with `cid`.
    #[must_use]
    pub fn embedded(cid: Option<String>) -> Self {
        Self { embedded: true, cid }
    }
}

impl HostBridge for StaticHostBridge {
    fn is_embedded(&self) -> bool {
        self.embedded
    }

    fn get_base_cid(&self) -> BridgeFuture<'_> {
        let cid = self.cid.clone();
        Box::pin(async move { cid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detached_bridge_has_nothing() {
        let bridge = StaticHostBridge::detached();
        assert!(!bridge.is_embedded());
        assert_eq!(bridge.get_base_cid().await, None);
    }

    #[tokio::test]
    async fn embedded_bridge_answers() {
        let bridge = StaticHostBridge::embedded(Some("host-cid".into()));
        assert!(bridge.is_embedded());
        assert_eq!(bridge.get_base_cid().await.as_deref(), Some("host-cid"));
    }
}
