//! The builders for every token form this crate understands.

use std::sync::Arc;

use http::HeaderName;
use once_cell::sync::Lazy;
use tracing::warn;

use super::AttributeBuilder;
use crate::attribute::{
    DateTimeAttribute, MdcAttribute, QueryParameterAttribute, RequestCookieAttribute,
    RequestHeaderAttribute, ResponseCookieAttribute, ResponseHeaderAttribute, SharedAttribute,
    UserDataAttribute, ALL_REQUEST_HEADERS, ALL_RESPONSE_HEADERS, BARE_QUERY_STRING, BYTES_SENT,
    BYTES_SENT_DASH, DATE_TIME, HOST_AND_PORT, IDENT_USERNAME, LOCAL_IP, LOCAL_PORT,
    LOCAL_SERVER_NAME, QUERY_STRING, RELATIVE_PATH, REMOTE_HOST, REMOTE_IP, REMOTE_USER,
    REQUEST_LINE, REQUEST_METHOD, REQUEST_PATH, REQUEST_PROTOCOL, REQUEST_SCHEME, REQUEST_URL,
    RESPONSE_CODE, RESPONSE_TIME_MICROS, RESPONSE_TIME_MILLIS, RESPONSE_TIME_NANOS,
    RESPONSE_TIME_SECONDS, SECURE, SSL_CIPHER, SSL_CLIENT_CERT, SSL_SESSION_ID, THREAD_NAME,
};

/// Matches a fixed set of tokens and hands out a shared singleton attribute
pub struct ExactTokenBuilder {
    name: &'static str,
    tokens: &'static [&'static str],
    attribute: &'static Lazy<SharedAttribute>,
}

impl ExactTokenBuilder {
    pub fn new(
        name: &'static str,
        tokens: &'static [&'static str],
        attribute: &'static Lazy<SharedAttribute>,
    ) -> Self {
        Self {
            name,
            tokens,
            attribute,
        }
    }
}

impl AttributeBuilder for ExactTokenBuilder {
    fn name(&self) -> &str {
        self.name
    }

    fn build(&self, token: &str) -> Option<SharedAttribute> {
        if self.tokens.contains(&token) {
            Some(Arc::clone(self.attribute))
        } else {
            None
        }
    }
}

/// Matches `<prefix>argument}` and builds a fresh attribute for the argument
///
/// Declines when the argument is empty or `make` rejects it.
pub struct ParameterizedBuilder {
    name: &'static str,
    prefix: &'static str,
    make: fn(&str) -> Option<SharedAttribute>,
}

impl ParameterizedBuilder {
    pub fn new(
        name: &'static str,
        prefix: &'static str,
        make: fn(&str) -> Option<SharedAttribute>,
    ) -> Self {
        Self { name, prefix, make }
    }
}

impl AttributeBuilder for ParameterizedBuilder {
    fn name(&self) -> &str {
        self.name
    }

    fn build(&self, token: &str) -> Option<SharedAttribute> {
        let argument = token.strip_prefix(self.prefix)?.strip_suffix('}')?;
        if argument.is_empty() {
            return None;
        }
        (self.make)(argument)
    }
}

fn header_name(name: &str) -> Option<HeaderName> {
    match HeaderName::from_bytes(name.as_bytes()) {
        Ok(header) => Some(header),
        Err(_) => {
            warn!(header = %name, "Invalid header name in access log pattern");
            None
        }
    }
}

fn request_header(name: &str) -> Option<SharedAttribute> {
    let header = header_name(name)?;
    Some(Arc::new(RequestHeaderAttribute::new(header)))
}

fn response_header(name: &str) -> Option<SharedAttribute> {
    let header = header_name(name)?;
    Some(Arc::new(ResponseHeaderAttribute::new(header)))
}

fn request_cookie(name: &str) -> Option<SharedAttribute> {
    Some(Arc::new(RequestCookieAttribute::new(name)))
}

fn response_cookie(name: &str) -> Option<SharedAttribute> {
    Some(Arc::new(ResponseCookieAttribute::new(name)))
}

fn query_parameter(name: &str) -> Option<SharedAttribute> {
    Some(Arc::new(QueryParameterAttribute::new(name)))
}

fn user_data(key: &str) -> Option<SharedAttribute> {
    Some(Arc::new(UserDataAttribute::new(key)))
}

fn mdc(key: &str) -> Option<SharedAttribute> {
    Some(Arc::new(MdcAttribute::new(key)))
}

fn date_time(format: &str) -> Option<SharedAttribute> {
    match DateTimeAttribute::with_format(format) {
        Some(attribute) => Some(Arc::new(attribute)),
        None => {
            warn!(format = %format, "Invalid date format in access log pattern");
            None
        }
    }
}

fn exact(
    name: &'static str,
    tokens: &'static [&'static str],
    attribute: &'static Lazy<SharedAttribute>,
) -> Box<dyn AttributeBuilder> {
    Box::new(ExactTokenBuilder::new(name, tokens, attribute))
}

fn parameterized(
    name: &'static str,
    prefix: &'static str,
    make: fn(&str) -> Option<SharedAttribute>,
) -> Box<dyn AttributeBuilder> {
    Box::new(ParameterizedBuilder::new(name, prefix, make))
}

/// Every builder shipped with the crate, in registration order
pub fn standard_builders() -> Vec<Box<dyn AttributeBuilder>> {
    vec![
        exact("Remote IP", &["%a", "%{REMOTE_IP}"], &REMOTE_IP),
        exact("Local IP", &["%A", "%{LOCAL_IP}"], &LOCAL_IP),
        exact("Bytes sent (dash)", &["%b"], &BYTES_SENT_DASH),
        exact("Bytes sent", &["%B", "%{BYTES_SENT}"], &BYTES_SENT),
        exact("Remote host", &["%h", "%{REMOTE_HOST}"], &REMOTE_HOST),
        exact("Request protocol", &["%H", "%{PROTOCOL}"], &REQUEST_PROTOCOL),
        exact("Thread name", &["%I", "%{THREAD_NAME}"], &THREAD_NAME),
        exact("Ident username", &["%l"], &IDENT_USERNAME),
        exact("Request method", &["%m", "%{METHOD}"], &REQUEST_METHOD),
        exact("Local port", &["%p", "%{LOCAL_PORT}"], &LOCAL_PORT),
        exact("Query string", &["%q", "%{QUERY_STRING}"], &QUERY_STRING),
        exact("Bare query string", &["%{BARE_QUERY_STRING}"], &BARE_QUERY_STRING),
        exact("Request line", &["%r", "%{REQUEST_LINE}"], &REQUEST_LINE),
        exact("Relative path", &["%R", "%{RELATIVE_PATH}"], &RELATIVE_PATH),
        exact("Response code", &["%s", "%{RESPONSE_CODE}"], &RESPONSE_CODE),
        exact("Date time", &["%t", "%{DATE_TIME}"], &DATE_TIME),
        exact("Remote user", &["%u", "%{REMOTE_USER}"], &REMOTE_USER),
        exact("Request URL", &["%U", "%{REQUEST_URL}"], &REQUEST_URL),
        exact("Request path", &["%{REQUEST_PATH}"], &REQUEST_PATH),
        exact("Local server name", &["%v", "%{LOCAL_SERVER_NAME}"], &LOCAL_SERVER_NAME),
        exact("Host and port", &["%{HOST_AND_PORT}"], &HOST_AND_PORT),
        exact("Request scheme", &["%{SCHEME}"], &REQUEST_SCHEME),
        exact("Response time", &["%D", "%{RESPONSE_TIME}"], &RESPONSE_TIME_MILLIS),
        exact("Response time (seconds)", &["%T"], &RESPONSE_TIME_SECONDS),
        exact("Response time (micros)", &["%{RESPONSE_TIME_MICROS}"], &RESPONSE_TIME_MICROS),
        exact("Response time (nanos)", &["%{RESPONSE_TIME_NANOS}"], &RESPONSE_TIME_NANOS),
        exact("SSL cipher", &["%{SSL_CIPHER}"], &SSL_CIPHER),
        exact("SSL client certificate", &["%{SSL_CLIENT_CERT}"], &SSL_CLIENT_CERT),
        exact("SSL session id", &["%{SSL_SESSION_ID}"], &SSL_SESSION_ID),
        exact("Secure", &["%{SECURE}", "${SECURE}"], &SECURE),
        exact("All request headers", &["%{ALL_REQUEST_HEADERS}"], &ALL_REQUEST_HEADERS),
        exact("All response headers", &["%{ALL_RESPONSE_HEADERS}"], &ALL_RESPONSE_HEADERS),
        parameterized("Request header", "%{i,", request_header),
        parameterized("Response header", "%{o,", response_header),
        parameterized("Request cookie", "%{c,", request_cookie),
        parameterized("Response cookie", "%{resp-cookie,", response_cookie),
        parameterized("Query parameter", "%{q,", query_parameter),
        parameterized("User data", "%{d,", user_data),
        parameterized("MDC", "%{X,", mdc),
        parameterized("Date time (custom)", "%{time,", date_time),
    ]
}
