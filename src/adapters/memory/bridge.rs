//! Scripted host bridge.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::ports::bridge::{BridgeFuture, HostBridge};

#[derive(Default)]
struct Inner {
    answer: Mutex<Option<Option<String>>>,
    calls: AtomicUsize,
}

/// Bridge that is detached until [`ScriptedBridge::embed`] is called.
#[derive(Clone, Default)]
pub struct ScriptedBridge {
    inner: Arc<Inner>,
}

impl ScriptedBridge {
    /// Marks the document as embedded; the host answers with `cid`.
    pub fn embed(&self, cid: Option<&str>) {
        *self.inner.answer.lock().expect("bridge lock poisoned") = Some(cid.map(String::from));
    }

    /// How many times the host was asked for a base id.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

impl HostBridge for ScriptedBridge {
    fn is_embedded(&self) -> bool {
        self.inner.answer.lock().expect("bridge lock poisoned").is_some()
    }

    fn get_base_cid(&self) -> BridgeFuture<'_> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.inner.answer.lock().expect("bridge lock poisoned").clone().flatten();
        Box::pin(async move { answer })
    }
}
