use std::fmt::Write as _;

use squall_core::ResponseClass;

use super::format::{format_rate_opt, format_secs};

pub(crate) fn render(summary: &squall_core::RunSummary) -> String {
    let board = &summary.scoreboard;
    let mut out = String::new();

    out.push_str("summary\n");
    writeln!(
        out,
        "  clients: {} passes: {}",
        summary.clients, summary.passes
    )
    .ok();
    writeln!(out, "  requests: {}", board.requests_sent()).ok();
    writeln!(
        out,
        "  elapsed: {} (sum over requests) wall clock: {}",
        format_secs(board.elapsed()),
        format_secs(summary.wall_clock)
    )
    .ok();
    writeln!(
        out,
        "  avg requests per second per client: {}",
        format_rate_opt(summary.per_request_rate())
    )
    .ok();
    writeln!(
        out,
        "  avg requests per second across all clients: {}",
        format_rate_opt(summary.per_client_rate())
    )
    .ok();
    writeln!(
        out,
        "  throughput: {}",
        format_rate_opt(summary.throughput())
    )
    .ok();

    out.push_str("  responses:");
    for class in ResponseClass::ALL {
        write!(out, " {class}={}", board.count(class)).ok();
    }
    out.push('\n');

    out.push('\n');
    if summary.failed() {
        out.push_str("result: FAILED\n");
    } else {
        out.push_str("result: PASSED\n");
    }
    out
}
