use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure class, used as a log field for sends that produced no status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The request could not be built from the scenario data.
    InvalidRequest,
    Connect,
    Timeout,
    /// Connected, but the exchange broke mid-flight.
    Exchange,
    Runtime,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported url scheme (expected http or https): {0}")]
    UnsupportedScheme(String),

    #[error("could not assemble request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("bad header name: {0}")]
    HeaderName(#[from] http::header::InvalidHeaderName),

    #[error("bad header value: {0}")]
    HeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("send failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("response body read failed: {0}")]
    BodyRead(#[from] hyper::Error),

    #[error("session runtime could not start: {0}")]
    Runtime(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_)
            | Self::UnsupportedScheme(_)
            | Self::RequestBuild(_)
            | Self::HeaderName(_)
            | Self::HeaderValue(_) => ErrorKind::InvalidRequest,
            Self::Request(err) if err.is_connect() => ErrorKind::Connect,
            Self::Request(_) | Self::BodyRead(_) => ErrorKind::Exchange,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Runtime(_) => ErrorKind::Runtime,
        }
    }
}
