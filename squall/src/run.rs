use anyhow::Context as _;
use std::path::Path;

use squall_core::{HttpConnector, RunConfig, Scenario, SessionOptions};

use crate::cli::{CheckArgs, RunArgs};
use crate::exit_codes::ExitCode;
use crate::output;
use crate::run_error::RunError;

pub fn run(args: RunArgs) -> Result<ExitCode, RunError> {
    let scenario = load(&args.scenario)?;
    let out = output::formatter(args.output);

    let cfg = RunConfig {
        clients: args.clients,
        passes: args.repeat,
        ..RunConfig::default()
    };
    let connector = HttpConnector::new(session_options(&args));

    out.print_header(&args.scenario, &scenario, &cfg);

    let progress = if args.no_progress {
        None
    } else {
        let planned = scenario
            .requests_per_pass()
            .saturating_mul(u64::from(cfg.passes))
            .saturating_mul(cfg.clients);
        out.progress(planned)
    };

    let summary = squall_core::execute(&scenario, &cfg, &connector, progress)?;

    out.print_summary(&summary)
        .map_err(RunError::RuntimeError)?;

    Ok(ExitCode::from_outcome(summary.failed()))
}

pub fn check(args: CheckArgs) -> Result<ExitCode, RunError> {
    let scenario = load(&args.scenario)?;
    print!("{}", describe(&args.scenario, &scenario));
    Ok(ExitCode::Success)
}

fn load(path: &Path) -> Result<Scenario, RunError> {
    squall_core::load_file(path)
        .with_context(|| format!("failed to load scenario: {}", path.display()))
        .map_err(RunError::LoadError)
}

fn session_options(args: &RunArgs) -> SessionOptions {
    SessionOptions {
        user_agent: Some(args.user_agent.clone()),
        connect_timeout: Some(args.connect_timeout),
        request_timeout: args.timeout,
        ..SessionOptions::default()
    }
}

fn describe(path: &Path, scenario: &Scenario) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    writeln!(out, "scenario: {}", path.display()).ok();
    writeln!(
        out,
        "requests: {} ({} sends per pass)",
        scenario.requests.len(),
        scenario.requests_per_pass()
    )
    .ok();
    writeln!(
        out,
        "options: persist_cookies={} fail_on_tcp_error={} fail_on_http_error={} fail_on_http_redirect={}",
        scenario.persist_cookies,
        scenario.policy.on_tcp_error,
        scenario.policy.on_http_error,
        scenario.policy.on_http_redirect
    )
    .ok();

    for (i, r) in scenario.requests.iter().enumerate() {
        writeln!(out, "#{} {} {} x{}", i + 1, r.method, r.url, r.repeat).ok();
        for (name, value) in r.wire_headers() {
            writeln!(out, "  {name}: {value}").ok();
        }
        if let Some(body) = &r.body {
            writeln!(out, "  body: {} bytes", body.bytes.len()).ok();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_resolved_requests() {
        let scenario = squall_core::load_str(
            r#"<testScenario>
                 <clientSetup>
                   <options><option name="baseUrl" value="http://h/api/"/></options>
                   <headers><header name="Accept" value="*/*"/></headers>
                 </clientSetup>
                 <request url="items" repeat="2"/>
                 <request url="items" method="POST"><rawData>{}</rawData></request>
               </testScenario>"#,
        )
        .unwrap_or_else(|err| panic!("load: {err}"));

        let text = describe(Path::new("s.xml"), &scenario);
        assert!(text.contains("requests: 2 (3 sends per pass)"), "{text}");
        assert!(text.contains("#1 GET http://h/api/items x2"), "{text}");
        assert!(text.contains("#2 POST http://h/api/items x1"), "{text}");
        assert!(text.contains("  content-type: application/octet-stream"), "{text}");
        assert!(text.contains("  body: 2 bytes"), "{text}");
    }
}
