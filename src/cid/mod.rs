//! Client identifier resolution.
//!
//! [`CidService`] is the single entry point. It validates the scope, waits
//! for consent, then routes:
//!
//! - documents served from their publisher's own origin read (and, when
//!   asked, create) a per-scope cookie via [`cookie::ScopeCookieManager`];
//! - proxy-served documents derive `hash(base_id + source_origin + scope)`
//!   from the base id owned by [`base::BaseCidManager`].
//!
//! Durable writes happen on spawned tasks gated by persistence consent, so
//! resolution must run inside a tokio runtime.

pub mod base;
pub mod cookie;
pub mod entropy;
pub mod record;
pub mod request;
mod tasks;

pub use request::{validate_scope, ScopeArg, ScopeRequest};

use std::sync::Arc;

use tracing::{debug, warn};

use self::base::BaseCidManager;
use self::cookie::ScopeCookieManager;
use self::tasks::PersistenceTasks;
use crate::consent::Consent;
use crate::context::ServiceContext;
use crate::error::{CidError, StorageError};
use crate::ports::KeyValueStore;

/// Storage key of the opt-out flag.
pub const OPT_OUT_STORAGE_KEY: &str = "cid-optout";

/// Identifier service for one document.
pub struct CidService {
    ctx: Arc<ServiceContext>,
    base: BaseCidManager,
    cookies: ScopeCookieManager,
    tasks: Arc<PersistenceTasks>,
}

impl CidService {
    /// Creates the service for the document described by `ctx`.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let tasks = Arc::new(PersistenceTasks::default());
        Self {
            base: BaseCidManager::new(Arc::clone(&ctx), Arc::clone(&tasks)),
            cookies: ScopeCookieManager::new(Arc::clone(&ctx), Arc::clone(&tasks)),
            ctx,
            tasks,
        }
    }

    /// The context this service resolves against.
    #[must_use]
    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Resolves the identifier for `request`.
    ///
    /// The scope is validated before the first suspension point, so an
    /// invalid scope fails without ever awaiting `consent`. Otherwise waits
    /// for `consent` (unbounded; see [`Consent`]). `persistence_consent`
    /// gates only durable writes and defaults to `consent`.
    ///
    /// Returns `Ok(None)` when no identifier exists and none may be created,
    /// or when the user opted out.
    ///
    /// # Errors
    ///
    /// - [`CidError::InvalidScope`] for a scope outside `[A-Za-z0-9_-]+`.
    /// - [`CidError::NoIdentifier`] when an embedding host has no base id.
    /// - [`CidError::NotProxyOrigin`] when a proxy URL carries no publisher host.
    pub async fn resolve(
        &self,
        request: impl Into<ScopeArg>,
        consent: Consent,
        persistence_consent: Option<Consent>,
    ) -> Result<Option<String>, CidError> {
        let request = request.into().into_request()?;
        let persistence_consent = persistence_consent.unwrap_or_else(|| consent.clone());

        consent.settled().await;

        if self.is_opted_out() {
            debug!(scope = %request.scope, "user opted out of client ids");
            return Ok(None);
        }

        if !self.ctx.is_proxy_document() {
            return Ok(self.cookies.get_or_create(&request, &persistence_consent));
        }

        let source_origin = self.ctx.classifier.get_proxy_source_origin(&self.ctx.document.url)?;
        let base_cid = self.base.get_base_cid(&persistence_consent).await?;
        Ok(Some(self.ctx.hasher.hash_str(&format!("{base_cid}{source_origin}{}", request.scope))))
    }

    /// Records that the user opted out; later resolutions yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag could not be stored.
    pub fn opt_out(&self) -> Result<(), StorageError> {
        opt_out(&*self.ctx.store)
    }

    /// Whether the opt-out flag is set.
    #[must_use]
    pub fn is_opted_out(&self) -> bool {
        is_opted_out(&*self.ctx.store)
    }

    /// Waits for every persistence task spawned so far.
    ///
    /// Never forces consent: if a persistence consent is still pending, so is this.
    pub async fn flush(&self) {
        self.tasks.flush().await;
    }
}

/// Sets the opt-out flag in `store`.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn opt_out(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.set(OPT_OUT_STORAGE_KEY, "1")
}

/// Reads the opt-out flag. An unreadable store reads as not opted out.
#[must_use]
pub fn is_opted_out(store: &dyn KeyValueStore) -> bool {
    match store.get(OPT_OUT_STORAGE_KEY) {
        Ok(flag) => flag.is_some(),
        Err(e) => {
            warn!(error = %e, "opt-out flag unreadable; assuming not opted out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryHarness;
    use crate::context::Document;
    use url::Url;

    const PROXY_URL: &str = "https://example-com.cdn.ampproject.org/c/s/example.com/page";
    const DIRECT_URL: &str = "https://example.com/page";

    fn service(harness: &MemoryHarness, url: &str) -> CidService {
        CidService::new(harness.context(Document::new(Url::parse(url).unwrap())))
    }

    #[tokio::test]
    async fn invalid_scope_fails_without_awaiting_consent() {
        let harness = MemoryHarness::new();
        let service = service(&harness, PROXY_URL);
        let (_grant, never) = Consent::pending();

        let err = service.resolve("bad scope!", never, None).await.unwrap_err();

        assert_eq!(err, CidError::InvalidScope("bad scope!".into()));
        assert_eq!(harness.entropy.draws(), 0);
    }

    #[tokio::test]
    async fn resolution_waits_for_consent() {
        let harness = MemoryHarness::new();
        let service = Arc::new(service(&harness, PROXY_URL));
        let (grant, consent) = Consent::pending();

        let pending = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.resolve("s", consent, None).await })
        };
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert_eq!(harness.entropy.draws(), 0);

        grant.settle();
        let cid = pending.await.unwrap().unwrap();
        assert!(cid.is_some());
    }

    #[tokio::test]
    async fn proxy_ids_are_derived_per_scope() {
        let harness = MemoryHarness::new();
        let service = service(&harness, PROXY_URL);

        let a = service.resolve("a", Consent::granted(), None).await.unwrap().unwrap();
        let b = service.resolve("b", Consent::granted(), None).await.unwrap().unwrap();
        service.flush().await;

        assert_ne!(a, b);
        let base = record::read_record(&harness.store).unwrap().unwrap().value;
        assert_ne!(a, base);
        let expected = service.context().hasher.hash_str(&format!("{base}https://example.comb"));
        assert_eq!(b, expected);
    }

    #[tokio::test]
    async fn proxy_ids_differ_per_source_origin() {
        let harness = MemoryHarness::new();
        let one = service(&harness, "https://a.cdn.ampproject.org/c/s/one.example/");
        let two = service(&harness, "https://a.cdn.ampproject.org/c/s/two.example/");

        let first = one.resolve("s", Consent::granted(), None).await.unwrap();
        one.flush().await;
        let second = two.resolve("s", Consent::granted(), None).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(harness.store.writes().len(), 1);
    }

    #[tokio::test]
    async fn direct_document_uses_cookie_unmodified() {
        let harness = MemoryHarness::new();
        let service = service(&harness, DIRECT_URL);

        let cid = service
            .resolve(ScopeRequest::creating("analytics"), Consent::granted(), None)
            .await
            .unwrap()
            .unwrap();
        service.flush().await;

        assert!(cid.starts_with(cookie::SELF_GENERATED_PREFIX));
        assert_eq!(harness.cookies.cookie("analytics").unwrap().value, cid);
        assert!(harness.store.writes().is_empty());
    }

    #[tokio::test]
    async fn bare_scope_on_direct_document_without_cookie_is_none() {
        let harness = MemoryHarness::new();
        let service = service(&harness, DIRECT_URL);

        assert_eq!(service.resolve("analytics", Consent::granted(), None).await.unwrap(), None);
        service.flush().await;
        assert!(harness.cookies.writes().is_empty());
    }

    #[tokio::test]
    async fn persistence_consent_gates_only_the_write() {
        let harness = MemoryHarness::new();
        let service = service(&harness, PROXY_URL);
        let (grant, persistence) = Consent::pending();

        let cid = service.resolve("s", Consent::granted(), Some(persistence)).await.unwrap();
        assert!(cid.is_some());
        tokio::task::yield_now().await;
        assert!(harness.store.writes().is_empty());

        grant.settle();
        service.flush().await;
        assert_eq!(harness.store.writes().len(), 1);
    }

    #[tokio::test]
    async fn opted_out_users_get_none() {
        let harness = MemoryHarness::new();
        let service = service(&harness, PROXY_URL);
        service.opt_out().unwrap();

        assert!(service.is_opted_out());
        assert_eq!(service.resolve("s", Consent::granted(), None).await.unwrap(), None);
        service.flush().await;
        assert_eq!(harness.store.writes().len(), 1);
        assert_eq!(harness.entropy.draws(), 0);
    }

    #[test]
    fn unreadable_store_is_not_opted_out() {
        let harness = MemoryHarness::new();
        opt_out(&harness.store).unwrap();
        assert!(is_opted_out(&harness.store));
        harness.store.fail_reads(true);
        assert!(!is_opted_out(&harness.store));
    }

    #[tokio::test]
    async fn malformed_proxy_url_is_an_error() {
        let harness = MemoryHarness::new();
        let service = service(&harness, "https://x.cdn.ampproject.org/");

        let err = service.resolve("s", Consent::granted(), None).await.unwrap_err();
        assert!(matches!(err, CidError::NotProxyOrigin(_)));
        assert_eq!(harness.entropy.draws(), 0);
    }
}
