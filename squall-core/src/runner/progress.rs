use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Monotonic tick counter (1-based) for progress emissions.
    pub tick: u64,
    pub elapsed: Duration,
    /// Requests sent so far, across all clients.
    pub requests_sent: u64,
    pub clients_done: u64,
    pub clients: u64,
}

pub type ProgressFn = std::sync::Arc<dyn Fn(ProgressUpdate) + Send + Sync + 'static>;

/// In-flight counters. Workers write, the progress observer only reads.
#[derive(Debug, Default)]
pub(crate) struct LiveCounters {
    requests_sent: AtomicU64,
    clients_done: AtomicU64,
}

impl LiveCounters {
    pub fn request_sent(&self) {
        self.requests_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn client_done(&self) {
        self.clients_done.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, tick: u64, elapsed: Duration, clients: u64) -> ProgressUpdate {
        ProgressUpdate {
            tick,
            elapsed,
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            clients_done: self.clients_done.load(Ordering::Relaxed),
            clients,
        }
    }
}
