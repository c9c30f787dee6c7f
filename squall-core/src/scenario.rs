mod document;
mod encode;
mod error;
mod header;
mod loader;
mod param;
mod request;

use url::Url;

use crate::runner::ResponseClass;

pub use encode::{FORM_URLENCODED, OCTET_STREAM, encode_form};
pub use error::{EncodingError, LoadError};
pub use header::{Header, Headers};
pub use loader::{load_file, load_str};
pub use param::{Param, ParamType, ParamValue};
pub use request::{Body, Request};

/// Which responses end a worker's scenario early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    /// Abort when no HTTP status could be obtained.
    pub on_tcp_error: bool,
    /// Abort on 4xx and 5xx.
    pub on_http_error: bool,
    /// Abort on 3xx.
    pub on_http_redirect: bool,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            on_tcp_error: true,
            on_http_error: true,
            on_http_redirect: false,
        }
    }
}

impl FailurePolicy {
    pub fn should_abort(&self, class: ResponseClass) -> bool {
        match class {
            ResponseClass::TransportError => self.on_tcp_error,
            ResponseClass::Redirection => self.on_http_redirect,
            ResponseClass::ClientError | ResponseClass::ServerError => self.on_http_error,
            ResponseClass::Informational | ResponseClass::Success => false,
        }
    }
}

/// A loaded scenario. Immutable once loaded; every worker reads the same instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub requests: Vec<Request>,
    pub base_url: Option<Url>,
    pub persist_cookies: bool,
    pub policy: FailurePolicy,
}

impl Scenario {
    /// Number of sends one uninterrupted pass performs.
    pub fn requests_per_pass(&self) -> u64 {
        self.requests.iter().map(|r| u64::from(r.repeat.get())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_tolerates_redirects_only() {
        let p = FailurePolicy::default();
        assert!(p.should_abort(ResponseClass::TransportError));
        assert!(!p.should_abort(ResponseClass::Informational));
        assert!(!p.should_abort(ResponseClass::Success));
        assert!(!p.should_abort(ResponseClass::Redirection));
        assert!(p.should_abort(ResponseClass::ClientError));
        assert!(p.should_abort(ResponseClass::ServerError));
    }

    #[test]
    fn permissive_policy_never_aborts() {
        let p = FailurePolicy {
            on_tcp_error: false,
            on_http_error: false,
            on_http_redirect: false,
        };
        for class in ResponseClass::ALL {
            assert!(!p.should_abort(class), "{class:?}");
        }
    }

    #[test]
    fn redirect_policy_only_covers_3xx() {
        let p = FailurePolicy {
            on_tcp_error: false,
            on_http_error: false,
            on_http_redirect: true,
        };
        let aborting: Vec<_> = ResponseClass::ALL
            .into_iter()
            .filter(|c| p.should_abort(*c))
            .collect();
        assert_eq!(aborting, vec![ResponseClass::Redirection]);
    }
}
