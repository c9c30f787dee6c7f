use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::Context as _;
use squall_testserver::TestServer;

fn status_code(out: &Output) -> i32 {
    out.status.code().unwrap_or(-1)
}

fn scenario_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/scenarios")
        .join(name)
}

fn ensure_exit(out: &Output, expected: i32) -> anyhow::Result<()> {
    anyhow::ensure!(
        status_code(out) == expected,
        "expected exit code {expected}, got {}\nstdout:\n{}\nstderr:\n{}",
        status_code(out),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    Ok(())
}

fn write_scenario(xml: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".xml")
        .tempfile()
        .context("create scenario file")?;
    file.write_all(xml.as_bytes())
        .context("write scenario file")?;
    Ok(file)
}

async fn run_squall(args: Vec<String>) -> anyhow::Result<Output> {
    let exe = env!("CARGO_BIN_EXE_squall");
    tokio::task::spawn_blocking(move || {
        Command::new(exe)
            .args(&args)
            .env_remove("RUST_LOG")
            .env_remove("SQUALL_CLIENTS")
            .env_remove("SQUALL_REPEAT")
            .output()
    })
    .await
    .context("spawn_blocking join")?
    .context("run squall binary")
}

#[test]
fn invalid_flags_exit_1() -> anyhow::Result<()> {
    let exe = env!("CARGO_BIN_EXE_squall");

    for bad in [
        vec!["run", "./does-not-matter.xml", "--clients", "0"],
        vec!["run", "./does-not-matter.xml", "--connect-timeout", "10x"],
        vec!["run"],
    ] {
        let out = Command::new(exe)
            .args(&bad)
            .output()
            .context("run squall binary")?;
        ensure_exit(&out, 1).with_context(|| format!("args: {bad:?}"))?;
    }

    Ok(())
}

#[test]
fn load_errors_exit_2() -> anyhow::Result<()> {
    let exe = env!("CARGO_BIN_EXE_squall");

    for (cmd, path) in [
        ("run", scenario_path("missing_url.xml")),
        ("run", scenario_path("malformed.xml")),
        ("check", scenario_path("missing_url.xml")),
        ("check", scenario_path("does-not-exist.xml")),
    ] {
        let out = Command::new(exe)
            .arg(cmd)
            .arg(&path)
            .output()
            .context("run squall binary")?;
        ensure_exit(&out, 2).with_context(|| format!("{cmd} {}", path.display()))?;

        let stderr = String::from_utf8_lossy(&out.stderr);
        anyhow::ensure!(
            stderr.contains("failed to load scenario"),
            "stderr: {stderr}"
        );
    }

    Ok(())
}

#[test]
fn check_prints_resolved_requests() -> anyhow::Result<()> {
    let out = Command::new(env!("CARGO_BIN_EXE_squall"))
        .arg("check")
        .arg(scenario_path("offline.xml"))
        .output()
        .context("run squall binary")?;
    ensure_exit(&out, 0)?;

    let stdout = String::from_utf8_lossy(&out.stdout);
    anyhow::ensure!(stdout.contains("requests: 2 (4 sends per pass)"), "{stdout}");
    anyhow::ensure!(
        stdout.contains("#1 POST http://127.0.0.1:9/api/login x1"),
        "{stdout}"
    );
    anyhow::ensure!(
        stdout.contains("#2 GET http://127.0.0.1:9/api/items x3"),
        "{stdout}"
    );
    anyhow::ensure!(stdout.contains("  Accept: text/csv"), "{stdout}");
    Ok(())
}

#[tokio::test]
async fn passing_run_exit_0() -> anyhow::Result<()> {
    let server = TestServer::start().await.context("start test server")?;
    let file = write_scenario(&format!(
        r#"<testScenario>
             <clientSetup><options><option name="baseUrl" value="{}"/></options></clientSetup>
             <request url="/ok" repeat="2"/>
           </testScenario>"#,
        server.base_url()
    ))?;

    let out = run_squall(vec![
        "run".to_string(),
        file.path().display().to_string(),
        "--clients".to_string(),
        "3".to_string(),
        "--no-progress".to_string(),
    ])
    .await?;

    let requests = server.stats().requests_total();
    server.shutdown().await;

    ensure_exit(&out, 0)?;
    anyhow::ensure!(requests == 6, "expected 6 requests, server saw {requests}");

    let stdout = String::from_utf8_lossy(&out.stdout);
    anyhow::ensure!(stdout.contains("result: PASSED"), "{stdout}");
    Ok(())
}

#[tokio::test]
async fn failed_scenario_exit_100() -> anyhow::Result<()> {
    let server = TestServer::start().await.context("start test server")?;
    let file = write_scenario(&format!(
        r#"<testScenario>
             <request url="{}"/>
             <request url="{}"/>
           </testScenario>"#,
        server.urls().status(500),
        server.urls().ok
    ))?;

    let out = run_squall(vec![
        "run".to_string(),
        file.path().display().to_string(),
        "-c".to_string(),
        "2".to_string(),
        "-r".to_string(),
        "5".to_string(),
        "--no-progress".to_string(),
    ])
    .await?;

    let requests = server.stats().requests_total();
    server.shutdown().await;

    ensure_exit(&out, 100)?;
    anyhow::ensure!(requests == 2, "expected 2 requests, server saw {requests}");

    let stdout = String::from_utf8_lossy(&out.stdout);
    anyhow::ensure!(stdout.contains("result: FAILED"), "{stdout}");
    Ok(())
}

#[test]
fn unreachable_host_fails_on_tcp_error() -> anyhow::Result<()> {
    let out = Command::new(env!("CARGO_BIN_EXE_squall"))
        .arg("run")
        .arg(scenario_path("offline.xml"))
        .arg("--connect-timeout")
        .arg("1s")
        .arg("--no-progress")
        .env_remove("SQUALL_CLIENTS")
        .env_remove("SQUALL_REPEAT")
        .output()
        .context("run squall binary")?;
    ensure_exit(&out, 100)?;

    let stdout = String::from_utf8_lossy(&out.stdout);
    anyhow::ensure!(stdout.contains("transport error=1"), "{stdout}");
    Ok(())
}
