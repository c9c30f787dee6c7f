use std::time::Instant;

use crate::scenario::Scenario;

use super::progress::LiveCounters;
use super::scoreboard::{ResponseClass, Scoreboard};
use super::transport::Transport;

/// One simulated client: a transport session and the scoreboard it fills.
#[derive(Debug)]
pub struct Worker<'a, T> {
    id: u64,
    transport: T,
    live: Option<&'a LiveCounters>,
}

impl<T: Transport> Worker<'static, T> {
    pub fn new(id: u64, transport: T) -> Self {
        Self {
            id,
            transport,
            live: None,
        }
    }
}

impl<'a, T: Transport> Worker<'a, T> {
    pub(crate) fn with_live(id: u64, transport: T, live: &'a LiveCounters) -> Self {
        Self {
            id,
            transport,
            live: Some(live),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replay `scenario` `passes` times, strictly in order.
    ///
    /// The first response the failure policy disqualifies marks the scoreboard failed and ends
    /// the run for this worker, including any remaining passes.
    pub fn run(&mut self, scenario: &Scenario, passes: u32) -> Scoreboard {
        let mut board = Scoreboard::new();

        for pass in 1..=passes {
            for (i, request) in scenario.requests.iter().enumerate() {
                for _ in 0..request.repeat.get() {
                    let t0 = Instant::now();
                    let outcome = self.transport.send(request);
                    let elapsed = t0.elapsed();

                    let class = ResponseClass::from_outcome(&outcome);
                    board.record(class, elapsed);
                    if let Some(live) = self.live {
                        live.request_sent();
                    }

                    match &outcome {
                        Ok(status) => tracing::trace!(
                            client = self.id,
                            request = i + 1,
                            status,
                            elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                            "response"
                        ),
                        Err(err) => tracing::debug!(
                            client = self.id,
                            request = i + 1,
                            kind = %err.kind(),
                            error = %err,
                            "transport error"
                        ),
                    }

                    if scenario.policy.should_abort(class) {
                        tracing::warn!(
                            client = self.id,
                            pass,
                            request = i + 1,
                            url = %request.url,
                            outcome = %class,
                            "scenario failed"
                        );
                        board.mark_failed();
                        return board;
                    }
                }
            }
        }

        board
    }
}
