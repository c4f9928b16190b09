//! # Attribute Module
//!
//! Exchange attributes are the compiled form of access-log pattern tokens.
//!
//! ## Overview
//!
//! Each attribute maps an [`Exchange`] to an optional string. Leaves read one
//! field of the exchange (`%s` reads the status code, `%{i,Host}` reads a
//! request header); [`CompositeAttribute`] concatenates children and the
//! decorators ([`QuotingAttribute`], [`SubstituteEmptyAttribute`]) transform the
//! output of a single child. A pattern compiles into a tree of these values,
//! built once and evaluated for every request.
//!
//! Attributes hold no per-request state, so trees are shared as
//! [`SharedAttribute`] (`Arc<dyn ExchangeAttribute>`). Attributes with a single
//! canonical form are process-wide singletons (see [`REMOTE_IP`] and friends);
//! parameterized ones (header name, cookie name, data key) are constructed per
//! token occurrence.
//!
//! ## Reads
//!
//! `None` means "not present or not applicable" and is kept distinct from an
//! empty string. An empty query string reads as `Some("")`; a request without a
//! TLS session reads `%{SSL_CIPHER}` as `None`.
//!
//! ## Writes
//!
//! A handful of attributes can be assigned (status code, request and response
//! headers, cookies, user data). Every other attribute rejects writes with
//! [`AttributeError::ReadOnly`]; a rejected write is always reported to the
//! caller.

mod composite;
mod connection;
mod constant;
mod cookie;
mod data;
mod datetime;
mod error;
mod headers;
mod query;
mod quoting;
mod request;
mod response;
mod ssl;
mod substitute;

pub use composite::CompositeAttribute;
pub use connection::{
    HostAndPortAttribute, LocalIpAttribute, LocalPortAttribute, LocalServerNameAttribute,
    RemoteHostAttribute, RemoteIpAttribute, SecureExchangeAttribute, HOST_AND_PORT, LOCAL_IP,
    LOCAL_PORT, LOCAL_SERVER_NAME, REMOTE_HOST, REMOTE_IP, SECURE,
};
pub use constant::ConstantAttribute;
pub use cookie::{RequestCookieAttribute, ResponseCookieAttribute};
pub use data::{MdcAttribute, UserDataAttribute};
pub use datetime::{DateTimeAttribute, COMMON_LOG_DATE_FORMAT, DATE_TIME};
pub use error::AttributeError;
pub use headers::{
    AllHeadersAttribute, RequestHeaderAttribute, ResponseHeaderAttribute, ALL_REQUEST_HEADERS,
    ALL_RESPONSE_HEADERS,
};
pub use query::QueryParameterAttribute;
pub use quoting::QuotingAttribute;
pub use request::{
    IdentUsernameAttribute, QueryStringAttribute, RelativePathAttribute, RemoteUserAttribute,
    RequestLineAttribute, RequestMethodAttribute, RequestPathAttribute, RequestProtocolAttribute,
    RequestSchemeAttribute, RequestUrlAttribute, ThreadNameAttribute, BARE_QUERY_STRING,
    IDENT_USERNAME, QUERY_STRING, RELATIVE_PATH, REMOTE_USER, REQUEST_LINE, REQUEST_METHOD,
    REQUEST_PATH, REQUEST_PROTOCOL, REQUEST_SCHEME, REQUEST_URL, THREAD_NAME,
};
pub use response::{
    format_response_time, BytesSentAttribute, ResponseCodeAttribute, ResponseTimeAttribute,
    TimeUnit, BYTES_SENT, BYTES_SENT_DASH, RESPONSE_CODE, RESPONSE_TIME_MICROS,
    RESPONSE_TIME_MILLIS, RESPONSE_TIME_NANOS, RESPONSE_TIME_SECONDS,
};
pub use ssl::{
    SslCipherAttribute, SslClientCertAttribute, SslSessionIdAttribute, SSL_CIPHER,
    SSL_CLIENT_CERT, SSL_SESSION_ID,
};
pub use substitute::SubstituteEmptyAttribute;

use std::fmt;
use std::sync::Arc;

use crate::exchange::Exchange;

/// A compiled pattern token: a named accessor from an exchange to a string.
pub trait ExchangeAttribute: fmt::Debug + Send + Sync {
    /// Human readable attribute kind, used in errors and diagnostics
    fn name(&self) -> &'static str;

    /// Read the attribute from an exchange
    fn read(&self, exchange: &dyn Exchange) -> Option<String>;

    /// Assign a value through the attribute
    ///
    /// The default rejects the write; only attributes backed by a mutable
    /// exchange field override it.
    fn write(&self, _exchange: &mut dyn Exchange, value: &str) -> Result<(), AttributeError> {
        Err(AttributeError::read_only(self.name(), value))
    }
}

/// Shared, immutable attribute tree node
pub type SharedAttribute = Arc<dyn ExchangeAttribute>;

/// Render a multi-valued field the way list values appear in access logs.
///
/// One value is returned bare, several are rendered as `[v1, v2]`. Callers
/// decide what an empty list means.
pub(crate) fn join_values(values: &[String]) -> String {
    match values {
        [single] => single.clone(),
        _ => format!("[{}]", values.join(", ")),
    }
}
