use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};
use once_cell::sync::OnceCell;

use super::{Exchange, TlsSession};

/// Owned exchange built from `http` crate types.
///
/// The server side fills in the request half with [`HttpExchange::builder`],
/// then records the outcome with [`HttpExchange::finish`] once the response
/// has been written.
///
/// # Example
///
/// ```rust
/// use brrtrouter_accesslog::exchange::{Exchange, HttpExchange};
/// use http::{Method, StatusCode};
///
/// let mut exchange = HttpExchange::builder(Method::GET, "/pets?limit=10").build();
/// exchange.finish(StatusCode::OK, 512);
///
/// assert_eq!(exchange.path(), "/pets");
/// assert_eq!(exchange.query(), Some("limit=10"));
/// assert!(exchange.response_ended());
/// ```
#[derive(Debug)]
pub struct HttpExchange {
    method: Method,
    path: String,
    relative_path: Option<String>,
    query: Option<String>,
    version: Version,
    scheme: String,
    request_headers: HeaderMap,
    response_headers: HeaderMap,
    response_cookies: Vec<(String, String)>,
    remote_addr: Option<SocketAddr>,
    local_addr: Option<SocketAddr>,
    remote_user: Option<String>,
    status: StatusCode,
    bytes_written: u64,
    tls: Option<TlsSession>,
    data: HashMap<String, String>,
    mdc: HashMap<String, String>,
    request_start: Option<Instant>,
    received_at: Option<DateTime<FixedOffset>>,
    response_ended: bool,
    first_response_time: OnceCell<Duration>,
}

impl HttpExchange {
    /// Start building an exchange for `method` and a request URI
    ///
    /// The URI is split at the first `?` into path and query string. A
    /// trailing `?` yields an empty (but present) query string.
    pub fn builder(method: Method, uri: &str) -> HttpExchangeBuilder {
        let (path, query) = match uri.split_once('?') {
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (uri.to_string(), None),
        };
        HttpExchangeBuilder {
            inner: HttpExchange {
                method,
                path,
                relative_path: None,
                query,
                version: Version::HTTP_11,
                scheme: "http".to_string(),
                request_headers: HeaderMap::new(),
                response_headers: HeaderMap::new(),
                response_cookies: Vec::new(),
                remote_addr: None,
                local_addr: None,
                remote_user: None,
                status: StatusCode::OK,
                bytes_written: 0,
                tls: None,
                data: HashMap::new(),
                mdc: HashMap::new(),
                request_start: None,
                received_at: None,
                response_ended: false,
                first_response_time: OnceCell::new(),
            },
        }
    }

    /// Record the response outcome and mark the response as ended
    pub fn finish(&mut self, status: StatusCode, bytes_written: u64) {
        self.status = status;
        self.bytes_written = bytes_written;
        self.response_ended = true;
    }

    /// Add to the running count of body bytes written
    pub fn add_bytes_written(&mut self, bytes: u64) {
        self.bytes_written = self.bytes_written.saturating_add(bytes);
    }

    /// Append a response header value, keeping existing values
    pub fn append_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.append(name, value);
    }

    /// Store an MDC value visible to `%{X,key}`
    pub fn set_mdc(&mut self, key: &str, value: &str) {
        self.mdc.insert(key.to_string(), value.to_string());
    }
}

impl Exchange for HttpExchange {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn relative_path(&self) -> &str {
        self.relative_path.as_deref().unwrap_or(&self.path)
    }

    fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    fn version(&self) -> Version {
        self.version
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    fn response_cookie(&self, name: &str) -> Option<String> {
        self.response_cookies
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    fn remote_user(&self) -> Option<&str> {
        self.remote_user.as_deref()
    }

    fn status(&self) -> StatusCode {
        self.status
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn tls_session(&self) -> Option<&TlsSession> {
        self.tls.as_ref()
    }

    fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    fn mdc(&self, key: &str) -> Option<String> {
        self.mdc.get(key).cloned()
    }

    fn request_start(&self) -> Option<Instant> {
        self.request_start
    }

    fn received_at(&self) -> Option<DateTime<FixedOffset>> {
        self.received_at
    }

    fn response_ended(&self) -> bool {
        self.response_ended
    }

    fn first_response_time(&self) -> Option<Duration> {
        self.first_response_time.get().copied()
    }

    fn record_first_response_time(&self, elapsed: Duration) {
        // first writer wins
        self.first_response_time.get_or_init(|| elapsed);
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn set_request_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.request_headers.insert(name, value);
    }

    fn set_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.insert(name, value);
    }

    fn set_response_cookie(&mut self, name: &str, value: &str) {
        self.response_cookies.retain(|(k, _)| k != name);
        self.response_cookies
            .push((name.to_string(), value.to_string()));
    }

    fn set_data(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
    }
}

/// Fluent builder for [`HttpExchange`]
///
/// Defaults: `HTTP/1.1`, scheme `http`, status `200`, no addresses, no TLS,
/// no recorded timings.
#[derive(Debug)]
pub struct HttpExchangeBuilder {
    inner: HttpExchange,
}

impl HttpExchangeBuilder {
    pub fn version(mut self, version: Version) -> Self {
        self.inner.version = version;
        self
    }

    pub fn scheme(mut self, scheme: &str) -> Self {
        self.inner.scheme = scheme.to_string();
        self
    }

    /// Path relative to the handler mount point, when it differs from the full path
    pub fn relative_path(mut self, path: &str) -> Self {
        self.inner.relative_path = Some(path.to_string());
        self
    }

    /// Append a request header value (repeated names accumulate)
    pub fn request_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.inner.request_headers.append(name, value);
        self
    }

    /// Append a response header value (repeated names accumulate)
    pub fn response_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.inner.response_headers.append(name, value);
        self
    }

    pub fn response_cookie(mut self, name: &str, value: &str) -> Self {
        self.inner.set_response_cookie(name, value);
        self
    }

    pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
        self.inner.remote_addr = Some(addr);
        self
    }

    pub fn local_addr(mut self, addr: SocketAddr) -> Self {
        self.inner.local_addr = Some(addr);
        self
    }

    pub fn remote_user(mut self, user: &str) -> Self {
        self.inner.remote_user = Some(user.to_string());
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.inner.status = status;
        self
    }

    pub fn bytes_written(mut self, bytes: u64) -> Self {
        self.inner.bytes_written = bytes;
        self
    }

    pub fn tls(mut self, session: TlsSession) -> Self {
        self.inner.tls = Some(session);
        self
    }

    pub fn data(mut self, key: &str, value: &str) -> Self {
        self.inner.set_data(key, value);
        self
    }

    pub fn mdc(mut self, key: &str, value: &str) -> Self {
        self.inner.set_mdc(key, value);
        self
    }

    pub fn request_start(mut self, start: Instant) -> Self {
        self.inner.request_start = Some(start);
        self
    }

    pub fn received_at(mut self, at: DateTime<FixedOffset>) -> Self {
        self.inner.received_at = Some(at);
        self
    }

    pub fn response_ended(mut self, ended: bool) -> Self {
        self.inner.response_ended = ended;
        self
    }

    pub fn build(self) -> HttpExchange {
        self.inner
    }
}
