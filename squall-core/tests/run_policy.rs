use std::sync::{Arc, Mutex};

use squall_core::runner::{Connector, Error, ResponseClass, RunConfig, Transport, execute};
use squall_core::scenario::{Request, Scenario, load_str};

/// Every client of a run shares one log of the paths it was asked to send.
#[derive(Clone, Default)]
struct Recording {
    sent: Arc<Mutex<Vec<(u64, String)>>>,
    statuses: Arc<Vec<(&'static str, u16)>>,
}

struct RecordingTransport {
    client: u64,
    shared: Recording,
}

impl Transport for RecordingTransport {
    fn send(&mut self, request: &Request) -> squall_http::Result<u16> {
        let path = request.url.path().to_string();
        let status = self
            .shared
            .statuses
            .iter()
            .find(|(p, _)| *p == path)
            .map_or(200, |(_, s)| *s);
        self.shared
            .sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((self.client, path));
        Ok(status)
    }
}

struct RecordingConnector {
    shared: Recording,
    next: Mutex<u64>,
}

impl RecordingConnector {
    fn new(statuses: Vec<(&'static str, u16)>) -> Self {
        Self {
            shared: Recording {
                sent: Arc::default(),
                statuses: Arc::new(statuses),
            },
            next: Mutex::new(0),
        }
    }

    fn sent(&self) -> Vec<(u64, String)> {
        self.shared
            .sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Connector for RecordingConnector {
    type Transport = RecordingTransport;

    fn connect(&self, _persist_cookies: bool) -> squall_http::Result<RecordingTransport> {
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        *next += 1;
        Ok(RecordingTransport {
            client: *next,
            shared: self.shared.clone(),
        })
    }
}

struct FailingConnector;

impl Connector for FailingConnector {
    type Transport = RecordingTransport;

    fn connect(&self, _persist_cookies: bool) -> squall_http::Result<RecordingTransport> {
        Err(squall_http::Error::InvalidUrl("nowhere".to_string()))
    }
}

fn scenario(xml: &str) -> Scenario {
    load_str(xml).unwrap_or_else(|err| panic!("expected scenario to load: {err}"))
}

fn config(clients: u64, passes: u32) -> RunConfig {
    RunConfig {
        clients,
        passes,
        ..RunConfig::default()
    }
}

#[test]
fn repeat_three_sends_three_times_per_client() {
    let s = scenario(
        r#"<testScenario>
             <request url="http://h/a" repeat="3"/>
             <request url="http://h/b"/>
           </testScenario>"#,
    );
    let connector = RecordingConnector::new(vec![]);
    let summary = execute(&s, &config(4, 1), &connector, None)
        .unwrap_or_else(|err| panic!("run failed: {err}"));

    assert!(!summary.failed());
    assert_eq!(summary.scoreboard.requests_sent(), 16);
    assert_eq!(summary.scoreboard.count(ResponseClass::Success), 16);

    let sent = connector.sent();
    for client in 1..=4 {
        let paths: Vec<_> = sent
            .iter()
            .filter(|(c, _)| *c == client)
            .map(|(_, p)| p.as_str())
            .collect();
        assert_eq!(paths, vec!["/a", "/a", "/a", "/b"], "client {client}");
    }
}

#[test]
fn server_error_stops_only_the_remaining_requests() {
    let s = scenario(
        r#"<testScenario>
             <request url="http://h/first"/>
             <request url="http://h/broken" repeat="5"/>
             <request url="http://h/never"/>
           </testScenario>"#,
    );
    let connector = RecordingConnector::new(vec![("/broken", 500)]);
    let summary = execute(&s, &config(2, 3), &connector, None)
        .unwrap_or_else(|err| panic!("run failed: {err}"));

    assert!(summary.failed());
    // Each client: /first then a single /broken, no further passes.
    assert_eq!(summary.scoreboard.requests_sent(), 4);
    assert_eq!(summary.scoreboard.count(ResponseClass::ServerError), 2);
    assert!(connector.sent().iter().all(|(_, p)| p != "/never"));
}

#[test]
fn tolerated_errors_keep_going_and_pass() {
    let s = scenario(
        r#"<testScenario>
             <clientSetup>
               <options><option name="failOnHttpError" value="no"/></options>
             </clientSetup>
             <request url="http://h/missing"/>
             <request url="http://h/ok"/>
           </testScenario>"#,
    );
    let connector = RecordingConnector::new(vec![("/missing", 404)]);
    let summary = execute(&s, &config(3, 2), &connector, None)
        .unwrap_or_else(|err| panic!("run failed: {err}"));

    assert!(!summary.failed());
    assert_eq!(summary.scoreboard.requests_sent(), 12);
    assert_eq!(summary.scoreboard.count(ResponseClass::ClientError), 6);
    assert_eq!(summary.scoreboard.count(ResponseClass::Success), 6);
}

#[test]
fn passes_multiply_the_scenario() {
    let s = scenario(
        r#"<testScenario>
             <request url="http://h/a" repeat="2"/>
             <request url="http://h/b"/>
           </testScenario>"#,
    );
    let connector = RecordingConnector::new(vec![]);
    let summary = execute(&s, &config(2, 2), &connector, None)
        .unwrap_or_else(|err| panic!("run failed: {err}"));

    assert_eq!(summary.passes, 2);
    assert_eq!(
        summary.scoreboard.requests_sent(),
        2 * 2 * s.requests_per_pass()
    );
}

#[test]
fn session_setup_failure_aborts_before_any_send() {
    let s = scenario(r#"<testScenario><request url="http://h/"/></testScenario>"#);
    let err = execute(&s, &config(2, 1), &FailingConnector, None)
        .err()
        .unwrap_or_else(|| panic!("expected a session error"));
    assert!(matches!(err, Error::Session(_)), "{err}");
}

#[test]
fn zero_passes_is_rejected() {
    let s = scenario(r#"<testScenario><request url="http://h/"/></testScenario>"#);
    let connector = RecordingConnector::new(vec![]);
    let err = execute(&s, &config(1, 0), &connector, None)
        .err()
        .unwrap_or_else(|| panic!("expected InvalidPasses"));
    assert!(matches!(err, Error::InvalidPasses));
    assert!(connector.sent().is_empty());
}
