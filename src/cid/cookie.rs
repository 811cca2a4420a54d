//! Scope cookie fallback for documents served from their own origin.
//!
//! Mirrors the base-id persistence race: a created cookie value is returned
//! immediately and written only after persistence consent, and only if no
//! other writer set the cookie in the meantime. Until it lands, the
//! generated value is remembered per cookie name so the document keeps
//! seeing one value.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;
use tracing::{debug, warn};

use super::entropy;
use super::request::ScopeRequest;
use super::tasks::PersistenceTasks;
use crate::consent::Consent;
use crate::context::ServiceContext;
use crate::ports::{CookieOptions, CookieStore};

/// Prefix marking cookie values this crate generated itself.
pub const SELF_GENERATED_PREFIX: &str = "cid-";

/// Lifetime granted to a scope cookie on creation and on each refresh.
#[must_use]
pub fn cookie_lifetime() -> Duration {
    Duration::days(365)
}

const COOKIE_OPTIONS: CookieOptions = CookieOptions { highest_available_domain: true };

/// A scope cookie as read back from the jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeCookieRecord {
    /// Cookie name.
    pub scope: String,
    /// Cookie value, including the marker prefix when self-generated.
    pub value: String,
    /// Whether the value carries [`SELF_GENERATED_PREFIX`].
    pub self_generated: bool,
}

impl ScopeCookieRecord {
    fn new(scope: &str, value: String) -> Self {
        let self_generated = value.starts_with(SELF_GENERATED_PREFIX);
        Self { scope: scope.to_string(), value, self_generated }
    }
}

/// Owns the cookie fallback for one document.
pub struct ScopeCookieManager {
    ctx: Arc<ServiceContext>,
    tasks: Arc<PersistenceTasks>,
    generated: Mutex<HashMap<String, String>>,
}

impl ScopeCookieManager {
    pub(crate) fn new(ctx: Arc<ServiceContext>, tasks: Arc<PersistenceTasks>) -> Self {
        Self { ctx, tasks, generated: Mutex::new(HashMap::new()) }
    }

    /// Reads the scope cookie; a jar fault reads as absent.
    #[must_use]
    pub fn read(&self, request: &ScopeRequest) -> Option<ScopeCookieRecord> {
        read_cookie(&*self.ctx.cookies, request.cookie_name())
    }

    /// Returns the scope cookie value, creating one when allowed.
    ///
    /// Returns `None` when the cookie is absent and `create_if_missing` is
    /// unset; nothing is generated or written in that case. A value created
    /// earlier by this manager is reused while its cookie is still unwritten.
    pub fn get_or_create(
        &self,
        request: &ScopeRequest,
        persistence_consent: &Consent,
    ) -> Option<String> {
        let name = request.cookie_name();

        if let Some(existing) = self.read(request) {
            if existing.self_generated {
                let expires_at = self.ctx.clock.now() + cookie_lifetime();
                if let Err(e) = self.ctx.cookies.set(name, &existing.value, expires_at, COOKIE_OPTIONS)
                {
                    warn!(cookie = name, error = %e, "failed to refresh scope cookie");
                }
            }
            return Some(existing.value);
        }

        if !request.create_if_missing {
            debug!(cookie = name, "scope cookie absent and creation not requested");
            return None;
        }

        let mut generated = self.generated.lock().expect("cookie cache lock poisoned");
        match generated.entry(name.to_string()) {
            Entry::Occupied(cached) => {
                debug!(cookie = name, "reusing scope cookie generated this session");
                Some(cached.get().clone())
            }
            Entry::Vacant(slot) => {
                let value = format!(
                    "{SELF_GENERATED_PREFIX}{}",
                    entropy::draw(&self.ctx).hashed(&*self.ctx.hasher)
                );
                debug!(cookie = name, "generated scope cookie");
                slot.insert(value.clone());
                self.spawn_store_if_absent(
                    name.to_string(),
                    value.clone(),
                    persistence_consent.clone(),
                );
                Some(value)
            }
        }
    }

    fn spawn_store_if_absent(&self, name: String, value: String, persistence_consent: Consent) {
        let ctx = Arc::clone(&self.ctx);
        self.tasks.spawn(async move {
            persistence_consent.settled().await;
            if read_cookie(&*ctx.cookies, &name).is_some() {
                debug!(cookie = %name, "scope cookie set by another writer; keeping theirs");
                return;
            }
            let expires_at = ctx.clock.now() + cookie_lifetime();
            if let Err(e) = ctx.cookies.set(&name, &value, expires_at, COOKIE_OPTIONS) {
                warn!(cookie = %name, error = %e, "failed to persist scope cookie");
            }
        });
    }
}

fn read_cookie(cookies: &dyn CookieStore, name: &str) -> Option<ScopeCookieRecord> {
    match cookies.get(name) {
        Ok(value) => value.map(|v| ScopeCookieRecord::new(name, v)),
        Err(e) => {
            warn!(cookie = name, error = %e, "scope cookie unreadable; treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryHarness;
    use crate::context::Document;
    use crate::ports::Clock;
    use url::Url;

    fn manager(harness: &MemoryHarness) -> (ScopeCookieManager, Arc<PersistenceTasks>) {
        let ctx = harness.context(Document::new(Url::parse("https://example.com/").unwrap()));
        let tasks = Arc::new(PersistenceTasks::default());
        (ScopeCookieManager::new(ctx, Arc::clone(&tasks)), tasks)
    }

    #[tokio::test]
    async fn absent_without_create_is_none_and_silent() {
        let harness = MemoryHarness::new();
        let (manager, tasks) = manager(&harness);

        let request = ScopeRequest { create_if_missing: false, ..ScopeRequest::creating("s") };
        assert_eq!(manager.get_or_create(&request, &Consent::granted()), None);
        tasks.flush().await;

        assert!(harness.cookies.writes().is_empty());
        assert_eq!(harness.entropy.draws(), 0);
    }

    #[tokio::test]
    async fn creates_marked_cookie_after_consent() {
        let harness = MemoryHarness::new();
        let (manager, tasks) = manager(&harness);
        let (grant, consent) = Consent::pending();

        let value = manager.get_or_create(&ScopeRequest::creating("analytics"), &consent).unwrap();
        assert!(value.starts_with(SELF_GENERATED_PREFIX));
        tokio::task::yield_now().await;
        assert!(harness.cookies.is_empty());

        grant.settle();
        tasks.flush().await;

        let cookie = harness.cookies.cookie("analytics").unwrap();
        assert_eq!(cookie.value, value);
        assert_eq!(cookie.expires_at, harness.clock.now() + cookie_lifetime());
        assert!(cookie.options.highest_available_domain);
        assert_eq!(harness.cookies.len(), 1);
    }

    #[tokio::test]
    async fn self_generated_cookie_expiry_is_refreshed_on_read() {
        let harness = MemoryHarness::new();
        let soon = harness.clock.now() + Duration::days(3);
        harness.cookies.insert("s", "cid-abc", soon);
        let (manager, _tasks) = manager(&harness);

        let value = manager.get_or_create(&ScopeRequest::creating("s"), &Consent::granted());

        assert_eq!(value.as_deref(), Some("cid-abc"));
        let writes = harness.cookies.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].expires_at, harness.clock.now() + cookie_lifetime());
    }

    #[tokio::test]
    async fn foreign_cookie_is_returned_untouched() {
        let harness = MemoryHarness::new();
        let soon = harness.clock.now() + Duration::days(3);
        harness.cookies.insert("_ga", "GA1.2.3", soon);
        let (manager, _tasks) = manager(&harness);

        let request = ScopeRequest::creating("ga").with_cookie_name("_ga");
        assert_eq!(manager.get_or_create(&request, &Consent::granted()).as_deref(), Some("GA1.2.3"));
        assert!(harness.cookies.writes().is_empty());
        assert!(!manager.read(&request).unwrap().self_generated);
    }

    #[tokio::test]
    async fn generated_value_is_stable_before_persistence() {
        let harness = MemoryHarness::new();
        let (manager, tasks) = manager(&harness);
        let (grant, consent) = Consent::pending();
        let request = ScopeRequest::creating("analytics");

        let first = manager.get_or_create(&request, &consent).unwrap();
        let second = manager.get_or_create(&request, &consent).unwrap();
        let third = manager.get_or_create(&request, &Consent::granted()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(harness.entropy.draws(), 1);

        grant.settle();
        tasks.flush().await;
        assert_eq!(harness.cookies.writes().len(), 1);
        assert_eq!(harness.cookies.cookie("analytics").unwrap().value, first);
    }

    #[tokio::test]
    async fn cache_is_keyed_by_cookie_name() {
        let harness = MemoryHarness::new();
        let (manager, _tasks) = manager(&harness);
        let (_grant, consent) = Consent::pending();

        let a = manager.get_or_create(&ScopeRequest::creating("a"), &consent).unwrap();
        let b = manager.get_or_create(&ScopeRequest::creating("b"), &consent).unwrap();

        assert_ne!(a, b);
        assert_eq!(harness.entropy.draws(), 2);
    }

    #[tokio::test]
    async fn concurrent_creation_keeps_first_persisted_value() {
        let harness = MemoryHarness::new();
        let (first_manager, first_tasks) = manager(&harness);
        let (second_manager, second_tasks) = manager(&harness);
        let (first_grant, first_consent) = Consent::pending();
        let (second_grant, second_consent) = Consent::pending();
        let request = ScopeRequest::creating("s");

        let first = first_manager.get_or_create(&request, &first_consent).unwrap();
        let second = second_manager.get_or_create(&request, &second_consent).unwrap();
        assert_ne!(first, second);

        second_grant.settle();
        while harness.cookies.writes().is_empty() {
            tokio::task::yield_now().await;
        }
        first_grant.settle();
        first_tasks.flush().await;
        second_tasks.flush().await;

        assert_eq!(harness.cookies.writes().len(), 1);
        assert_eq!(harness.cookies.cookie("s").unwrap().value, second);
        assert_eq!(first_manager.get_or_create(&request, &Consent::granted()).unwrap(), second);
    }

    #[tokio::test]
    async fn jar_outage_degrades_to_unpersisted_value() {
        let harness = MemoryHarness::new();
        harness.cookies.fail(true);
        let (manager, tasks) = manager(&harness);

        let value = manager.get_or_create(&ScopeRequest::creating("s"), &Consent::granted());
        tasks.flush().await;

        assert!(value.is_some());
        assert!(harness.cookies.writes().is_empty());
    }
}
