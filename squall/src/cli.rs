use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("squall/", env!("CARGO_PKG_VERSION"));

fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("duration cannot be empty (expected e.g. 10s, 250ms, 1m)".to_string());
    }
    humantime::parse_duration(s)
        .map_err(|err| format!("invalid duration '{s}' (expected e.g. 10s, 250ms, 1m): {err}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    HumanReadable,
    /// Emit JSON progress lines and a JSON summary line (NDJSON) to stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "squall",
    author,
    version,
    about = "HTTP load testing from declarative XML scenarios",
    long_about = "squall replays an XML scenario of HTTP requests concurrently across N simulated clients.\n\nEach client runs on its own thread with its own HTTP session and executes the scenario in order. A response matching the scenario's failure policy ends that client's run and fails the whole run.",
    after_help = "Examples:\n  squall run scenario.xml\n  squall run scenario.xml --clients 50 --repeat 10\n  squall run scenario.xml -c 8 --output json\n  squall check scenario.xml"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a scenario
    #[command(
        long_about = "Load a scenario and replay it with the configured number of clients.\n\nExits with 0 when every client passed and 100 when at least one client failed the scenario."
    )]
    Run(RunArgs),

    /// Load a scenario and print the resolved requests without sending anything
    Check(CheckArgs),
}

#[derive(Debug, Clone, Copy, Args)]
pub struct LogArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl LogArgs {
    #[must_use]
    pub fn level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the scenario (.xml)
    pub scenario: PathBuf,

    /// Number of concurrent clients
    #[arg(
        short,
        long,
        env = "SQUALL_CLIENTS",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub clients: u64,

    /// How many times each client replays the scenario
    #[arg(
        short,
        long,
        env = "SQUALL_REPEAT",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub repeat: u32,

    /// `User-Agent` sent by requests that do not declare one
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// TCP connect timeout (e.g. 3s, 500ms)
    #[arg(long, value_parser = parse_duration, default_value = "3s")]
    pub connect_timeout: Duration,

    /// Per-request timeout; unset waits indefinitely
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,

    /// Do not render live progress
    #[arg(long)]
    pub no_progress: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the scenario (.xml)
    pub scenario: PathBuf,

    #[command(flatten)]
    pub log: LogArgs,
}

impl Command {
    #[must_use]
    pub fn log(&self) -> &LogArgs {
        match self {
            Self::Run(args) => &args.log,
            Self::Check(args) => &args.log,
        }
    }
}
