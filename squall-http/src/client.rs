use bytes::Bytes;
use http::header::{CONTENT_LENGTH, HOST, HeaderName, HeaderValue};
use http_body_util::{BodyExt as _, Full};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use super::util::{authority, has_header};
use super::{Error, HttpRequest, HttpResponse, Result};

type Connector = HttpsConnector<HttpConnector>;

/// Async HTTP/1.1 client. Redirects are never followed: the response to the request as sent
/// is what the caller gets back.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client<Connector, Full<Bytes>>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(Some(Duration::from_secs(3)))
    }
}

impl HttpClient {
    #[must_use]
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        let mut tcp = HttpConnector::new();
        tcp.enforce_http(false);
        tcp.set_connect_timeout(connect_timeout);
        tcp.set_nodelay(true);

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(tcp);

        Self {
            inner: Client::builder(TokioExecutor::new()).build(connector),
        }
    }

    pub async fn request(&self, req: HttpRequest) -> Result<HttpResponse> {
        let timeout = req.timeout;
        let outgoing = build_request(req)?;

        let exchange = async { read_response(self.inner.request(outgoing).await?).await };

        // The limit covers the response body as well as the head.
        match timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => exchange.await,
        }
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.request(HttpRequest::get(url)).await
    }
}

fn build_request(req: HttpRequest) -> Result<http::Request<Full<Bytes>>> {
    let url = url::Url::parse(&req.url).map_err(|_| Error::InvalidUrl(req.url.clone()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::UnsupportedScheme(req.url));
    }
    let uri: hyper::Uri = req
        .url
        .parse()
        .map_err(|_| Error::InvalidUrl(req.url.clone()))?;

    let mut builder = http::Request::builder().method(req.method).uri(uri);

    if !has_header(&req.headers, HOST.as_str())
        && let Some(host) = authority(&url)
    {
        builder = builder.header(HOST, host);
    }
    if !req.body.is_empty() && !has_header(&req.headers, CONTENT_LENGTH.as_str()) {
        builder = builder.header(CONTENT_LENGTH, req.body.len());
    }

    // `header` appends, so repeated names go out as repeated lines in declaration order.
    for (name, value) in &req.headers {
        builder = builder.header(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }

    Ok(builder.body(Full::new(req.body))?)
}

async fn read_response(res: hyper::Response<Incoming>) -> Result<HttpResponse> {
    let (parts, body) = res.into_parts();

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    // Drain the body so the connection can go back to the pool.
    let body = body.collect().await?.to_bytes();

    Ok(HttpResponse {
        status: parts.status.as_u16(),
        body,
        headers,
    })
}
