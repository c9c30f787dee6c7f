use std::time::Duration;

use super::{CookieJar, Error, HttpClient, HttpRequest, HttpResponse, Result};
use super::util::has_header;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Keep cookies received on this session and send them back on later requests.
    pub persist_cookies: bool,
    /// Sent as `User-Agent` unless the request already carries one.
    pub user_agent: Option<String>,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            persist_cookies: false,
            user_agent: None,
            connect_timeout: Some(Duration::from_secs(3)),
            request_timeout: None,
        }
    }
}

/// A blocking HTTP session: one client, one connection pool, one optional cookie jar.
///
/// Each session drives its client on a private current-thread runtime, so a session must be
/// used from a plain OS thread (never from inside another tokio runtime).
#[derive(Debug)]
pub struct HttpSession {
    runtime: tokio::runtime::Runtime,
    client: HttpClient,
    cookies: Option<CookieJar>,
    user_agent: Option<String>,
    request_timeout: Option<Duration>,
}

impl HttpSession {
    pub fn new(options: SessionOptions) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let client = {
            let _guard = runtime.enter();
            HttpClient::new(options.connect_timeout)
        };

        Ok(Self {
            runtime,
            client,
            cookies: options.persist_cookies.then(CookieJar::new),
            user_agent: options.user_agent,
            request_timeout: options.request_timeout,
        })
    }

    /// Send one request and wait for the full response.
    pub fn send(&mut self, mut req: HttpRequest) -> Result<HttpResponse> {
        let url = url::Url::parse(&req.url).map_err(|_| Error::InvalidUrl(req.url.clone()))?;

        if let Some(ua) = &self.user_agent
            && !has_header(&req.headers, "user-agent")
        {
            req.headers.push(("User-Agent".to_string(), ua.clone()));
        }

        if let Some(jar) = &self.cookies
            && let Some(cookie) = jar.header_for(&url)
        {
            req.headers.push(("Cookie".to_string(), cookie));
        }

        if req.timeout.is_none() {
            req.timeout = self.request_timeout;
        }

        let res = self.runtime.block_on(self.client.request(req))?;

        if let Some(jar) = &mut self.cookies {
            jar.store(&url, res.header_values("set-cookie"));
        }

        Ok(res)
    }

    pub fn cookies(&self) -> Option<&CookieJar> {
        self.cookies.as_ref()
    }
}
