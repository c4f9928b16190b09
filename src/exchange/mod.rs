//! # Exchange Module
//!
//! The exchange module defines the request/response view that exchange
//! attributes read from and write to.
//!
//! ## Overview
//!
//! An [`Exchange`] is the live context of one HTTP request: method, URI,
//! headers in both directions, cookies, socket addresses, TLS session details,
//! the response status and the number of body bytes written. Attributes only
//! borrow an exchange for the duration of a single read or write; they never
//! own one, so a compiled attribute tree can be shared between threads and
//! evaluated against many concurrent requests.
//!
//! The trait is the seam between the attribute engine and the transport. The
//! server builds whatever type it likes and implements [`Exchange`] for it;
//! [`HttpExchange`] is the stock implementation over `http` crate types and is
//! what the CLI and the tests use.
//!
//! ## Absent vs empty
//!
//! Methods returning `Option` use `None` for "not present" (no TLS session, no
//! such cookie, no recorded start time). Attributes propagate that distinction,
//! so a missing header renders differently from a header with an empty value.
//!
//! ## Response time cache
//!
//! [`Exchange::first_response_time`] and [`Exchange::record_first_response_time`]
//! store the elapsed time measured on the first read after the response ended.
//! The value lives on the exchange rather than on the attribute, which keeps
//! attributes stateless.

mod http_exchange;
mod tls;

pub use http_exchange::{HttpExchange, HttpExchangeBuilder};
pub use tls::TlsSession;

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};

/// Read/write view of a single HTTP request/response pair.
///
/// Implementations must be `Send + Sync` so that a shared attribute tree can be
/// evaluated from any worker. Mutators take `&mut self`; the only state an
/// attribute changes through `&self` is the response-time cache.
pub trait Exchange: Send + Sync {
    /// HTTP method of the request
    fn method(&self) -> &Method;

    /// Request path without the query string
    fn path(&self) -> &str;

    /// Path relative to the mount point of the handler
    ///
    /// Defaults to [`Exchange::path`] for exchanges that are not mounted
    /// below a prefix.
    fn relative_path(&self) -> &str {
        self.path()
    }

    /// Raw query string without the leading `?`, if the URI had one
    fn query(&self) -> Option<&str>;

    /// Request URI as it appears on the request line
    fn uri(&self) -> String {
        match self.query() {
            Some(q) => format!("{}?{}", self.path(), q),
            None => self.path().to_string(),
        }
    }

    /// HTTP version of the request
    fn version(&self) -> Version;

    /// Request scheme (`http` or `https`)
    fn scheme(&self) -> &str;

    /// Request headers
    fn request_headers(&self) -> &HeaderMap;

    /// Response headers
    fn response_headers(&self) -> &HeaderMap;

    /// Value of a request cookie
    ///
    /// The default implementation parses every `Cookie` request header.
    fn request_cookie(&self, name: &str) -> Option<String> {
        self.request_headers()
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|c| c.split(';'))
            .find_map(|pair| {
                let mut parts = pair.trim().splitn(2, '=');
                let key = parts.next()?.trim();
                if key == name {
                    Some(parts.next().unwrap_or("").trim().to_string())
                } else {
                    None
                }
            })
    }

    /// Value of a cookie set on the response
    fn response_cookie(&self, name: &str) -> Option<String>;

    /// All values of a query parameter, in order of appearance
    ///
    /// The default implementation decodes [`Exchange::query`] as
    /// `application/x-www-form-urlencoded`.
    fn query_params(&self, name: &str) -> Vec<String> {
        match self.query() {
            Some(q) => url::form_urlencoded::parse(q.as_bytes())
                .filter(|(k, _)| *k == name)
                .map(|(_, v)| v.into_owned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Address of the peer
    fn remote_addr(&self) -> Option<SocketAddr>;

    /// Address the request was accepted on
    fn local_addr(&self) -> Option<SocketAddr>;

    /// Name of the authenticated principal, if any
    fn remote_user(&self) -> Option<&str> {
        None
    }

    /// Response status code
    fn status(&self) -> StatusCode;

    /// Number of response body bytes written so far
    fn bytes_written(&self) -> u64;

    /// TLS session of the connection, if the request arrived over TLS
    fn tls_session(&self) -> Option<&TlsSession>;

    /// Whether the request arrived over a secure transport
    fn is_secure(&self) -> bool {
        self.tls_session().is_some() || self.scheme().eq_ignore_ascii_case("https")
    }

    /// Arbitrary per-exchange user data
    fn data(&self, key: &str) -> Option<&str>;

    /// Mapped diagnostic context value for this request
    fn mdc(&self, _key: &str) -> Option<String> {
        None
    }

    /// Monotonic instant at which request processing started
    fn request_start(&self) -> Option<Instant>;

    /// Wall-clock time at which the request was received
    fn received_at(&self) -> Option<DateTime<FixedOffset>>;

    /// Whether the response has been fully written
    fn response_ended(&self) -> bool;

    /// Elapsed time cached by the first read after the response ended
    fn first_response_time(&self) -> Option<Duration>;

    /// Cache the elapsed time; later calls keep the first value
    fn record_first_response_time(&self, elapsed: Duration);

    /// Replace the response status code
    fn set_status(&mut self, status: StatusCode);

    /// Replace all values of a request header
    fn set_request_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Replace all values of a response header
    fn set_response_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Add or replace a cookie on the response
    fn set_response_cookie(&mut self, name: &str, value: &str);

    /// Store a user data value
    fn set_data(&mut self, key: &str, value: &str);
}

/// Protocol token used on request lines and by `%H`
pub fn protocol_name(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}
