//! Fire-and-forget task dispatch with failure capture.
//!
//! Work handed to the `Dispatcher` runs detached from the caller. Its result
//! is always observed by a supervisor task: errors and panics are logged and
//! go no further. The dispatcher also counts in-flight work so shutdown and
//! tests can wait for it to drain.

use crate::errors::AppResult;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{error, warn};

#[derive(Default)]
struct Inner {
    in_flight: AtomicUsize,
    idle: Notify,
}

#[derive(Clone, Default)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` on its own task. Must be called from inside a tokio runtime.
    pub fn spawn<F>(&self, label: impl Into<String>, work: F)
    where
        F: Future<Output = AppResult<()>> + Send + 'static,
    {
        let label = label.into();
        let inner = Arc::clone(&self.inner);
        inner.in_flight.fetch_add(1, Ordering::SeqCst);

        // the inner handle turns a panic into a JoinError we can log
        let handle = tokio::spawn(work);

        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(task = %label, error = %e, "detached task failed"),
                Err(e) if e.is_panic() => error!(task = %label, "detached task panicked"),
                Err(e) => warn!(task = %label, error = %e, "detached task cancelled"),
            }

            if inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                inner.idle.notify_waiters();
            }
        });
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until no dispatched work is running. Returns `false` if `limit`
    /// elapsed first.
    pub async fn wait_idle(&self, limit: Duration) -> bool {
        let drained = async {
            loop {
                // register before checking so a wakeup in between is not lost
                let notified = self.inner.idle.notified();
                if self.in_flight() == 0 {
                    return;
                }
                notified.await;
            }
        };

        tokio::time::timeout(limit, drained).await.is_ok()
    }
}
