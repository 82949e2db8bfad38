//! Outstanding-task counter.
//!
//! Tracks tasks that were enqueued but have not yet finished. The count is
//! raised by [`OutstandingTasks::track`] before a task becomes visible to
//! workers and lowered when the returned [`InFlight`] guard is dropped, so
//! every task decrements exactly once whether it succeeds, fails or is
//! discarded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    count: AtomicUsize,
    idle: Notify,
}

/// Shared counter of in-flight sync tasks
#[derive(Debug, Clone, Default)]
pub struct OutstandingTasks {
    inner: Arc<Inner>,
}

impl OutstandingTasks {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one task; the count drops again when the guard is dropped
    pub fn track(&self) -> InFlight {
        self.inner.count.fetch_add(1, Ordering::SeqCst);
        InFlight {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Current number of outstanding tasks
    pub fn count(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Wait until no task is outstanding
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent drop to zero is not missed
            notified.as_mut().enable();

            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Proof that a task is outstanding; decrements the counter once on drop
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the task finished"]
pub struct InFlight {
    inner: Arc<Inner>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let previous = self.inner.count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "outstanding-task counter underflow");
        if previous == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
