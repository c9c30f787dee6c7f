use std::net::SocketAddr;

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;

/// Fixed-route HTTP server for exercising squall scenarios by hand.
///
/// Prints `HTTP_URL=<url>` to stdout once it accepts connections.
#[derive(Debug, Parser)]
#[command(name = "squall-testserver", version)]
struct Args {
    /// Address to listen on; port 0 picks a free port
    #[arg(long, default_value = "127.0.0.1:0")]
    bind: SocketAddr,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("bind {}", args.bind))?;
    let addr = listener.local_addr()?;

    let stats = squall_testserver::TestServerStats::default();
    let app = squall_testserver::router(stats.clone());

    println!("HTTP_URL=http://{addr}");
    for path in [
        squall_testserver::PATH_OK,
        squall_testserver::PATH_STATUS,
        squall_testserver::PATH_REDIRECT,
        squall_testserver::PATH_COOKIE_SET,
        squall_testserver::PATH_COOKIE_CHECK,
        squall_testserver::PATH_COOKIE_CLEAR,
        squall_testserver::PATH_ECHO,
        squall_testserver::PATH_SLOW,
        squall_testserver::PATH_SLOW_BODY,
    ] {
        eprintln!("  http://{addr}{path}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    eprintln!("served {} requests", stats.requests_total());
    Ok(())
}
