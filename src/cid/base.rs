//! Base identifier lifecycle: cache, expiry, refresh cadence, generation and
//! the consent-gated persistence race.
//!
//! Persistence is optimistic. A newly generated id is handed back at once;
//! a spawned task waits for persistence consent, re-reads the store and
//! writes only if no valid record appeared meanwhile. Two first-time callers
//! can both see "absent" and both write, in which case the store's last write
//! wins and later sessions converge on it. Callers must not assume the id
//! they received before persistence settled is the one that got persisted.

use std::sync::{Arc, Mutex};

use tracing::debug;

use super::entropy;
use super::record::{self, BaseCidRecord};
use super::tasks::PersistenceTasks;
use crate::consent::Consent;
use crate::context::ServiceContext;
use crate::error::CidError;

/// Owns the base id for one document session.
pub struct BaseCidManager {
    ctx: Arc<ServiceContext>,
    cache: Mutex<Option<String>>,
    tasks: Arc<PersistenceTasks>,
}

impl BaseCidManager {
    pub(crate) fn new(ctx: Arc<ServiceContext>, tasks: Arc<PersistenceTasks>) -> Self {
        Self { ctx, cache: Mutex::new(None), tasks }
    }

    /// Returns the base id, creating one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CidError::NoIdentifier`] when the document is embedded by a
    /// delegated host that has no id to give.
    pub async fn get_base_cid(&self, persistence_consent: &Consent) -> Result<String, CidError> {
        if let Some(cached) = self.cached() {
            return Ok(cached);
        }

        let now = self.ctx.clock.now();
        if let Some(stored) = record::load_valid(&*self.ctx.store, now) {
            if stored.needs_refresh(now) {
                debug!("stored base cid older than refresh cadence; refreshing timestamp");
                self.spawn_refresh(stored.value.clone(), persistence_consent.clone());
            }
            return Ok(self.remember(stored.value));
        }

        // The host owns persistence here; nothing is written locally.
        if self.ctx.bridge.is_embedded() {
            let cid = self.ctx.bridge.get_base_cid().await.ok_or(CidError::NoIdentifier)?;
            debug!("using base cid supplied by embedding host");
            return Ok(self.remember(cid));
        }

        let fresh = entropy::draw(&self.ctx).hashed(&*self.ctx.hasher);
        debug!("generated new base cid");
        self.spawn_store_if_absent(fresh.clone(), persistence_consent.clone());
        Ok(self.remember(fresh))
    }

    /// The value cached for this session, if any.
    #[must_use]
    pub fn cached(&self) -> Option<String> {
        self.cache.lock().expect("base cid cache lock poisoned").clone()
    }

    // A concurrent call may have cached first; the first cached value stays.
    fn remember(&self, value: String) -> String {
        self.cache.lock().expect("base cid cache lock poisoned").get_or_insert(value).clone()
    }

    fn spawn_refresh(&self, value: String, persistence_consent: Consent) {
        let ctx = Arc::clone(&self.ctx);
        self.tasks.spawn(async move {
            persistence_consent.settled().await;
            let record = BaseCidRecord::new(value, ctx.clock.now());
            record::store_quietly(&*ctx.store, &record);
        });
    }

    fn spawn_store_if_absent(&self, value: String, persistence_consent: Consent) {
        let ctx = Arc::clone(&self.ctx);
        self.tasks.spawn(async move {
            persistence_consent.settled().await;
            let now = ctx.clock.now();
            if record::load_valid(&*ctx.store, now).is_some() {
                debug!("base cid persisted by another writer; keeping theirs");
                return;
            }
            record::store_quietly(&*ctx.store, &BaseCidRecord::new(value, now));
        });
    }
}
