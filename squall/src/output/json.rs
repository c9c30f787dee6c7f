use anyhow::Context as _;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use squall_core::ResponseClass;

use super::OutputFormatter;

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(
        &self,
        _scenario_path: &Path,
        _scenario: &squall_core::Scenario,
        _cfg: &squall_core::RunConfig,
    ) {
    }

    fn progress(&self, planned: u64) -> Option<squall_core::ProgressFn> {
        Some(Arc::new(move |u| {
            let line = build_progress_line(&u, planned);
            if let Err(err) = write_json_line(&mut std::io::stdout().lock(), &line) {
                tracing::debug!(%err, "dropping progress line");
            }
        }))
    }

    fn print_summary(&self, summary: &squall_core::RunSummary) -> anyhow::Result<()> {
        let line = build_summary_line(summary);
        write_json_line(&mut std::io::stdout().lock(), &line)
            .context("failed to write JSON summary")
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonProgressLine {
    pub kind: &'static str,
    pub tick: u64,
    pub elapsed_secs: f64,
    pub clients: u64,
    pub clients_done: u64,
    pub requests_sent: u64,
    pub requests_planned: u64,
}

fn build_progress_line(u: &squall_core::ProgressUpdate, planned: u64) -> JsonProgressLine {
    JsonProgressLine {
        kind: "progress",
        tick: u.tick,
        elapsed_secs: u.elapsed.as_secs_f64(),
        clients: u.clients,
        clients_done: u.clients_done,
        requests_sent: u.requests_sent,
        requests_planned: planned,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub result: &'static str,
    pub clients: u64,
    pub passes: u32,
    pub requests_sent: u64,
    /// Sum of per-request latencies.
    pub elapsed_secs: f64,
    pub wall_clock_secs: f64,
    pub per_request_rate: Option<f64>,
    pub per_client_rate: Option<f64>,
    pub throughput: Option<f64>,
    pub responses: JsonResponses,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonResponses {
    pub transport_error: u64,
    #[serde(rename = "1xx")]
    pub informational: u64,
    #[serde(rename = "2xx")]
    pub success: u64,
    #[serde(rename = "3xx")]
    pub redirection: u64,
    #[serde(rename = "4xx")]
    pub client_error: u64,
    #[serde(rename = "5xx")]
    pub server_error: u64,
}

fn build_summary_line(summary: &squall_core::RunSummary) -> JsonSummaryLine {
    let board = &summary.scoreboard;

    JsonSummaryLine {
        kind: "summary",
        result: if summary.failed() { "failed" } else { "passed" },
        clients: summary.clients,
        passes: summary.passes,
        requests_sent: board.requests_sent(),
        elapsed_secs: board.elapsed_secs(),
        wall_clock_secs: summary.wall_clock.as_secs_f64(),
        per_request_rate: summary.per_request_rate(),
        per_client_rate: summary.per_client_rate(),
        throughput: summary.throughput(),
        responses: JsonResponses {
            transport_error: board.count(ResponseClass::TransportError),
            informational: board.count(ResponseClass::Informational),
            success: board.count(ResponseClass::Success),
            redirection: board.count(ResponseClass::Redirection),
            client_error: board.count(ResponseClass::ClientError),
            server_error: board.count(ResponseClass::ServerError),
        },
    }
}

fn write_json_line<W: Write, T: Serialize>(out: &mut W, line: &T) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, line)?;
    writeln!(out)?;
    out.flush()
}
