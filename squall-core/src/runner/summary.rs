use std::time::Duration;

use super::scoreboard::Scoreboard;

/// Aggregate result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub clients: u64,
    pub passes: u32,
    /// All client scoreboards merged.
    pub scoreboard: Scoreboard,
    pub wall_clock: Duration,
}

impl RunSummary {
    pub fn failed(&self) -> bool {
        self.scoreboard.failed()
    }

    /// Average load produced by one client: `1 / (elapsed / requests)`.
    pub fn per_request_rate(&self) -> Option<f64> {
        let requests = self.requests()?;
        finite(1.0 / (self.scoreboard.elapsed_secs() / requests))
    }

    /// Average load observed by the server: `1 / ((elapsed / clients) / requests)`.
    pub fn per_client_rate(&self) -> Option<f64> {
        let requests = self.requests()?;
        let clients = self.clients as f64;
        finite(1.0 / ((self.scoreboard.elapsed_secs() / clients) / requests))
    }

    /// Requests per wall-clock second across all clients.
    pub fn throughput(&self) -> Option<f64> {
        let requests = self.requests()?;
        finite(requests / self.wall_clock.as_secs_f64())
    }

    fn requests(&self) -> Option<f64> {
        match self.scoreboard.requests_sent() {
            0 => None,
            n => Some(n as f64),
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
