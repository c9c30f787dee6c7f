use cookie::Cookie;
use cookie_store::CookieStore;
use url::Url;

/// Per-session cookie store with RFC 6265 matching (domain, path, expiry, `Secure`).
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    store: CookieStore,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the `Set-Cookie` header values received in response to a request for `url`.
    /// Unparsable values are skipped.
    pub fn store<'a>(&mut self, url: &Url, set_cookies: impl IntoIterator<Item = &'a str>) {
        let parsed = set_cookies.into_iter().filter_map(|raw| {
            Cookie::parse(raw.to_string())
                .inspect_err(|err| tracing::debug!(%err, "ignoring malformed Set-Cookie"))
                .ok()
        });
        self.store.store_response_cookies(parsed, url);
    }

    /// Value for a `Cookie` request header, if any unexpired cookie matches `url`.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let joined = self
            .store
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        (!joined.is_empty()).then_some(joined)
    }

    pub fn is_empty(&self) -> bool {
        self.store.iter_unexpired().next().is_none()
    }
}
