use std::num::NonZeroU32;

use bytes::Bytes;
use url::Url;

use super::header::Headers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub content_type: String,
    pub bytes: Bytes,
}

impl Body {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// A fully resolved request: the url is absolute and every inherited header is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: http::Method,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Body>,
    pub repeat: NonZeroU32,
}

impl Request {
    pub fn new(method: http::Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
            repeat: NonZeroU32::MIN,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_repeat(mut self, repeat: NonZeroU32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Header list as sent: the body content type replaces any declared `Content-Type`.
    pub fn wire_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.headers.clone();
        if let Some(body) = &self.body {
            headers.apply(&super::Header::replacing(
                http::header::CONTENT_TYPE.as_str(),
                body.content_type.as_str(),
            ));
        }
        headers.to_pairs()
    }
}
