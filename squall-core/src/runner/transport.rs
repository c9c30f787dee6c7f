use squall_http::{HttpRequest, HttpSession, SessionOptions};

use crate::scenario::Request;

/// Synchronous request/response primitive a worker drives.
///
/// Implementations must not follow redirects: the outcome is the literal response to the
/// declared request.
pub trait Transport {
    /// Send `request` and return its status code.
    fn send(&mut self, request: &Request) -> squall_http::Result<u16>;
}

/// Creates one transport session per client.
pub trait Connector {
    type Transport: Transport + Send;

    fn connect(&self, persist_cookies: bool) -> squall_http::Result<Self::Transport>;
}

impl Transport for HttpSession {
    fn send(&mut self, request: &Request) -> squall_http::Result<u16> {
        let mut req = HttpRequest::new(request.method.clone(), request.url.to_string());
        req.headers = request.wire_headers();
        if let Some(body) = &request.body {
            req.body = body.bytes.clone();
        }

        let res = HttpSession::send(self, req)?;
        Ok(res.status)
    }
}

/// Connects real HTTP sessions. Cookie persistence comes from the scenario, everything else
/// from the run options.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    options: SessionOptions,
}

impl HttpConnector {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }
}

impl Connector for HttpConnector {
    type Transport = HttpSession;

    fn connect(&self, persist_cookies: bool) -> squall_http::Result<HttpSession> {
        HttpSession::new(SessionOptions {
            persist_cookies,
            ..self.options.clone()
        })
    }
}
