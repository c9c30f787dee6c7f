use tracing_subscriber::EnvFilter;

use crate::cli::LogArgs;

/// Install the stderr log subscriber. `RUST_LOG` wins over the verbosity flags.
pub(crate) fn init(args: &LogArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.level()));

    // Progress bars and JSON lines own stdout; logs always go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .try_init();
}
