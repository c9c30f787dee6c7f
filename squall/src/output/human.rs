use anyhow::Context as _;
use std::io::Write as _;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

mod format;
mod progress;
mod summary;

use format::{format_duration, format_rate};
use progress::HumanProgress;
use summary::render;

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput {
    progress: Arc<HumanProgress>,
}

impl HumanReadableOutput {
    pub(crate) fn new() -> Self {
        Self {
            progress: Arc::new(HumanProgress::new()),
        }
    }
}

impl OutputFormatter for HumanReadableOutput {
    fn print_header(
        &self,
        scenario_path: &std::path::Path,
        scenario: &squall_core::Scenario,
        cfg: &squall_core::RunConfig,
    ) {
        println!("scenario: {}", scenario_path.display());
        println!(
            "requests: {} ({} sends per pass) clients={} passes={}",
            scenario.requests.len(),
            scenario.requests_per_pass(),
            cfg.clients,
            cfg.passes
        );
        println!();
    }

    fn progress(&self, planned: u64) -> Option<squall_core::ProgressFn> {
        let progress = self.progress.clone();
        // (requests, elapsed) at the previous tick.
        let prev: Mutex<(u64, Duration)> = Mutex::new((0, Duration::ZERO));

        Some(Arc::new(move |u| {
            let (prev_requests, prev_elapsed) = {
                let mut inner = prev.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                std::mem::replace(&mut *inner, (u.requests_sent, u.elapsed))
            };

            let dt = u.elapsed.saturating_sub(prev_elapsed).as_secs_f64().max(1e-9);
            let rps = (u.requests_sent.saturating_sub(prev_requests) as f64) / dt;

            let message = format!(
                "clients_done={}/{} requests={} rps={} elapsed={}",
                u.clients_done,
                u.clients,
                u.requests_sent,
                format_rate(rps),
                format_duration(u.elapsed)
            );
            progress.update(planned, u.requests_sent, message);
        }))
    }

    fn print_summary(&self, summary: &squall_core::RunSummary) -> anyhow::Result<()> {
        self.progress.finish();
        let mut out = std::io::stdout().lock();
        out.write_all(render(summary).as_bytes())
            .and_then(|()| out.flush())
            .context("failed to write summary")
    }
}
