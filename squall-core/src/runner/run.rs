use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::scenario::Scenario;

use super::config::RunConfig;
use super::error::{Error, Result};
use super::progress::{LiveCounters, ProgressFn};
use super::scoreboard::Scoreboard;
use super::summary::RunSummary;
use super::transport::Connector;
use super::worker::Worker;

/// Run `scenario` on `config.clients` threads and merge their scoreboards.
///
/// Every session is connected before the first thread starts, so a setup failure never leaves a
/// partial run behind. The call returns once every worker has finished.
pub fn execute<C: Connector>(
    scenario: &Scenario,
    config: &RunConfig,
    connector: &C,
    progress: Option<ProgressFn>,
) -> Result<RunSummary> {
    config.validate()?;

    let mut transports = Vec::new();
    for _ in 0..config.clients {
        transports.push(
            connector
                .connect(scenario.persist_cookies)
                .map_err(Error::Session)?,
        );
    }

    tracing::info!(
        clients = config.clients,
        passes = config.passes,
        requests = scenario.requests.len(),
        "starting run"
    );

    let live = LiveCounters::default();
    let started = Instant::now();

    let boards = thread::scope(|s| -> Result<Vec<Scoreboard>> {
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let observer = match progress {
            Some(on_progress) => {
                let live = &live;
                let interval = config.progress_interval;
                let clients = config.clients;
                let handle = thread::Builder::new()
                    .name("progress".to_string())
                    .spawn_scoped(s, move || {
                        observe(&on_progress, interval, started, live, clients, &done_rx);
                    })
                    .map_err(Error::Spawn)?;
                Some(handle)
            }
            None => None,
        };

        let mut handles = Vec::with_capacity(transports.len());
        for (id, transport) in (1..).zip(transports) {
            let live = &live;
            let passes = config.passes;
            let handle = thread::Builder::new()
                .name(format!("client-{id}"))
                .spawn_scoped(s, move || {
                    let mut worker = Worker::with_live(id, transport, live);
                    let board = worker.run(scenario, passes);
                    live.client_done();
                    board
                })
                .map_err(Error::Spawn)?;
            handles.push(handle);
        }

        let mut boards = Vec::with_capacity(handles.len());
        let mut panicked = false;
        for handle in handles {
            match handle.join() {
                Ok(board) => boards.push(board),
                Err(_) => panicked = true,
            }
        }

        drop(done_tx);
        if let Some(observer) = observer
            && observer.join().is_err()
        {
            tracing::warn!("progress observer panicked");
        }

        if panicked {
            return Err(Error::WorkerPanicked);
        }
        Ok(boards)
    })?;

    let scoreboard = Scoreboard::merged(&boards);
    let summary = RunSummary {
        clients: config.clients,
        passes: config.passes,
        scoreboard,
        wall_clock: started.elapsed(),
    };

    tracing::info!(
        requests = summary.scoreboard.requests_sent(),
        failed = summary.failed(),
        wall_clock_ms = u64::try_from(summary.wall_clock.as_millis()).unwrap_or(u64::MAX),
        "run finished"
    );

    Ok(summary)
}

fn observe(
    on_progress: &ProgressFn,
    interval: Duration,
    started: Instant,
    live: &LiveCounters,
    clients: u64,
    done: &mpsc::Receiver<()>,
) {
    let mut tick = 0;
    loop {
        match done.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                tick += 1;
                on_progress(live.snapshot(tick, started.elapsed(), clients));
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}
