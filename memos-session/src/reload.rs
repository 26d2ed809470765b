use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;

/// Hook for throwing away all client state and starting over.
pub trait Reloader: Send + Sync {
    fn reload(&self);
}

/// [`Reloader`] that records requests for the embedding application to act on.
#[derive(Debug, Default)]
pub struct ReloadSignal {
    requests: AtomicU64,
    notify: Notify,
}

impl ReloadSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reloads requested so far.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Take pending requests, returning whether there were any.
    pub fn take(&self) -> bool {
        self.requests.swap(0, Ordering::SeqCst) > 0
    }

    /// Wait until the next reload request.
    pub async fn requested(&self) {
        self.notify.notified().await;
    }
}

impl Reloader for ReloadSignal {
    fn reload(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_one();
    }
}
