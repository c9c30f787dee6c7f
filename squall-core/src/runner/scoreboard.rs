use std::time::Duration;

/// Outcome bucket of one send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
pub enum ResponseClass {
    /// No valid HTTP status was obtained.
    #[strum(to_string = "transport error")]
    TransportError,
    #[strum(to_string = "1xx")]
    Informational,
    #[strum(to_string = "2xx")]
    Success,
    #[strum(to_string = "3xx")]
    Redirection,
    #[strum(to_string = "4xx")]
    ClientError,
    #[strum(to_string = "5xx")]
    ServerError,
}

impl ResponseClass {
    pub const ALL: [Self; 6] = [
        Self::TransportError,
        Self::Informational,
        Self::Success,
        Self::Redirection,
        Self::ClientError,
        Self::ServerError,
    ];

    /// Statuses outside `100..=599` count as transport errors.
    pub fn from_status(status: u16) -> Self {
        match status {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::TransportError,
        }
    }

    pub fn from_outcome<E>(outcome: &Result<u16, E>) -> Self {
        match outcome {
            Ok(status) => Self::from_status(*status),
            Err(_) => Self::TransportError,
        }
    }

    /// Histogram bucket: 0 for transport errors, otherwise the status hundreds digit.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-client counters.
///
/// Every recorded send lands in exactly one bucket, so the buckets always sum to
/// `requests_sent`. Once failed, a scoreboard stays failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    requests_sent: u64,
    elapsed: Duration,
    response_class: [u64; 6],
    failed: bool,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, class: ResponseClass, elapsed: Duration) {
        self.requests_sent += 1;
        self.response_class[class.index()] += 1;
        self.elapsed = self.elapsed.saturating_add(elapsed);
    }

    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn merge(&mut self, other: &Scoreboard) {
        self.requests_sent += other.requests_sent;
        self.elapsed = self.elapsed.saturating_add(other.elapsed);
        for (acc, n) in self.response_class.iter_mut().zip(other.response_class) {
            *acc += n;
        }
        self.failed |= other.failed;
    }

    pub fn merged<'a>(boards: impl IntoIterator<Item = &'a Scoreboard>) -> Self {
        let mut out = Self::new();
        for b in boards {
            out.merge(b);
        }
        out
    }

    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    /// Sum of per-send latencies, not wall-clock time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn response_classes(&self) -> &[u64; 6] {
        &self.response_class
    }

    pub fn count(&self, class: ResponseClass) -> u64 {
        self.response_class[class.index()]
    }

    pub fn failed(&self) -> bool {
        self.failed
    }
}
