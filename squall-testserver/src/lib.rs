use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use tokio::time::{Duration, sleep};

pub const PATH_OK: &str = "/ok";
pub const PATH_STATUS: &str = "/status/{code}";
pub const PATH_REDIRECT: &str = "/redirect";
pub const PATH_COOKIE_SET: &str = "/cookie/set";
pub const PATH_COOKIE_CHECK: &str = "/cookie/check";
pub const PATH_COOKIE_CLEAR: &str = "/cookie/clear";
pub const PATH_ECHO: &str = "/echo";
pub const PATH_SLOW: &str = "/slow";
pub const PATH_SLOW_BODY: &str = "/slow-body";

pub const SESSION_COOKIE: &str = "session=squall";

#[derive(Debug, Clone, Default)]
pub struct TestServerStats {
    requests_total: Arc<AtomicU64>,
    redirect_targets_followed: Arc<AtomicU64>,
    cookies_seen: Arc<AtomicU64>,
    last_request: Arc<Mutex<Option<SeenRequest>>>,
}

/// What the server saw on the most recent `/echo` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenRequest {
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub x_test: Vec<String>,
    pub body: Vec<u8>,
}

impl TestServerStats {
    fn inc_requests_total(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Hits on `/ok` that carried the marker query left by `/redirect`.
    pub fn redirect_targets_followed(&self) -> u64 {
        self.redirect_targets_followed.load(Ordering::Relaxed)
    }

    pub fn cookies_seen(&self) -> u64 {
        self.cookies_seen.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[derive(Debug, Clone)]
pub struct TestServerUrls {
    pub base_url: String,
    pub ok: String,
    pub redirect: String,
    pub cookie_set: String,
    pub cookie_check: String,
    pub cookie_clear: String,
    pub echo: String,
    pub slow: String,
    pub slow_body: String,
}

impl TestServerUrls {
    pub fn new(base_url: String) -> Self {
        Self {
            ok: format!("{base_url}{PATH_OK}"),
            redirect: format!("{base_url}{PATH_REDIRECT}"),
            cookie_set: format!("{base_url}{PATH_COOKIE_SET}"),
            cookie_check: format!("{base_url}{PATH_COOKIE_CHECK}"),
            cookie_clear: format!("{base_url}{PATH_COOKIE_CLEAR}"),
            echo: format!("{base_url}{PATH_ECHO}"),
            slow: format!("{base_url}{PATH_SLOW}"),
            slow_body: format!("{base_url}{PATH_SLOW_BODY}"),
            base_url,
        }
    }

    pub fn status(&self, code: u16) -> String {
        format!("{}/status/{code}", self.base_url)
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle_ok(
    State(stats): State<TestServerStats>,
    uri: axum::http::Uri,
) -> &'static str {
    stats.inc_requests_total();
    if uri.query() == Some("from=redirect") {
        stats
            .redirect_targets_followed
            .fetch_add(1, Ordering::Relaxed);
    }
    "ok"
}

async fn handle_status(
    State(stats): State<TestServerStats>,
    Path(code): Path<u16>,
) -> StatusCode {
    stats.inc_requests_total();
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn handle_redirect(State(stats): State<TestServerStats>) -> Response {
    stats.inc_requests_total();
    (
        StatusCode::FOUND,
        [(header::LOCATION, "/ok?from=redirect")],
    )
        .into_response()
}

async fn handle_cookie_set(State(stats): State<TestServerStats>) -> Response {
    stats.inc_requests_total();
    (
        StatusCode::OK,
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
        "cookie set",
    )
        .into_response()
}

async fn handle_cookie_clear(State(stats): State<TestServerStats>) -> Response {
    stats.inc_requests_total();
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            format!("{SESSION_COOKIE}; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"),
        )],
        "cookie cleared",
    )
        .into_response()
}

async fn handle_cookie_check(
    State(stats): State<TestServerStats>,
    headers: HeaderMap,
) -> StatusCode {
    stats.inc_requests_total();
    let has_session = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|pair| pair.trim() == SESSION_COOKIE));

    if has_session {
        stats.cookies_seen.fetch_add(1, Ordering::Relaxed);
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn handle_echo(
    State(stats): State<TestServerStats>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Bytes) {
    stats.inc_requests_total();

    let seen = SeenRequest {
        content_type: header_str(&headers, header::CONTENT_TYPE),
        user_agent: header_str(&headers, header::USER_AGENT),
        x_test: headers
            .get_all("x-test")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect(),
        body: body.to_vec(),
    };
    *stats
        .last_request
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(seen);

    (StatusCode::OK, body)
}

async fn handle_slow(State(stats): State<TestServerStats>) -> &'static str {
    stats.inc_requests_total();
    sleep(Duration::from_millis(50)).await;
    "slow"
}

/// Sends the status line and headers right away, then the body after a pause.
async fn handle_slow_body(State(stats): State<TestServerStats>) -> Body {
    stats.inc_requests_total();
    let (tx, rx) = mpsc::channel::<Result<Bytes, std::convert::Infallible>>(1);
    tokio::spawn(async move {
        sleep(Duration::from_millis(500)).await;
        let _ = tx.send(Ok(Bytes::from_static(b"finally"))).await;
    });
    Body::from_stream(ReceiverStream::new(rx))
}

pub fn router(stats: TestServerStats) -> Router {
    Router::new()
        .route(PATH_OK, get(handle_ok))
        .route(PATH_STATUS, get(handle_status))
        .route(PATH_REDIRECT, get(handle_redirect))
        .route(PATH_COOKIE_SET, get(handle_cookie_set))
        .route(PATH_COOKIE_CHECK, get(handle_cookie_check))
        .route(PATH_COOKIE_CLEAR, get(handle_cookie_clear))
        .route(PATH_ECHO, post(handle_echo).put(handle_echo))
        .route(PATH_SLOW, get(handle_slow))
        .route(PATH_SLOW_BODY, get(handle_slow_body))
        .with_state(stats)
}

pub struct TestServer {
    addr: SocketAddr,
    base_url: String,
    urls: TestServerUrls,
    stats: TestServerStats,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let stats = TestServerStats::default();

        let app = router(stats.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = serve.await;
        });

        let base_url = format!("http://{addr}");
        let urls = TestServerUrls::new(base_url.clone());

        Ok(Self {
            addr,
            base_url,
            urls,
            stats,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn urls(&self) -> &TestServerUrls {
        &self.urls
    }

    pub fn stats(&self) -> &TestServerStats {
        &self.stats
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some()
            && let Some(task) = self.task.take()
        {
            task.abort();
        }
    }
}
