//! Book-keeping for fire-and-forget persistence.

use std::future::Future;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use tracing::warn;

/// Persistence tasks spawned by one service and not yet awaited.
#[derive(Default)]
pub(crate) struct PersistenceTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl PersistenceTasks {
    /// Spawns `task` on the current runtime.
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut handles = self.handles.lock().expect("task list lock poisoned");
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Waits for every task spawned so far, including ones spawned while waiting.
    pub(crate) async fn flush(&self) {
        loop {
            let batch = {
                let mut handles = self.handles.lock().expect("task list lock poisoned");
                std::mem::take(&mut *handles)
            };
            if batch.is_empty() {
                return;
            }
            for handle in batch {
                if let Err(e) = handle.await {
                    warn!(error = %e, "persistence task failed");
                }
            }
        }
    }
}
