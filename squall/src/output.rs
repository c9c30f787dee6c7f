use crate::cli::OutputFormat;
use std::path::Path;

mod human;
mod json;

pub(crate) trait OutputFormatter: Send + Sync {
    fn print_header(
        &self,
        scenario_path: &Path,
        scenario: &squall_core::Scenario,
        cfg: &squall_core::RunConfig,
    );
    /// `planned` is the number of sends a run without failures performs.
    fn progress(&self, planned: u64) -> Option<squall_core::ProgressFn>;
    fn print_summary(&self, summary: &squall_core::RunSummary) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput::new()),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}
