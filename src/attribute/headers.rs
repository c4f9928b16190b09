//! Request and response header attributes.

use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue};
use once_cell::sync::Lazy;

use super::{join_values, AttributeError, ExchangeAttribute, SharedAttribute};
use crate::exchange::Exchange;

fn header_values(headers: &HeaderMap, name: &HeaderName) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect()
}

fn read_header(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    let values = header_values(headers, name);
    if values.is_empty() {
        None
    } else {
        Some(join_values(&values))
    }
}

/// `%{i,name}`: all values of a request header
///
/// No values reads as `None`, one value bare, several as `[v1, v2]`.
/// Writing replaces every value of the header on the request.
#[derive(Debug, Clone)]
pub struct RequestHeaderAttribute {
    header: HeaderName,
}

impl RequestHeaderAttribute {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl ExchangeAttribute for RequestHeaderAttribute {
    fn name(&self) -> &'static str {
        "Request header"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        read_header(exchange.request_headers(), &self.header)
    }

    fn write(&self, exchange: &mut dyn Exchange, value: &str) -> Result<(), AttributeError> {
        let value = HeaderValue::from_str(value)
            .map_err(|_| AttributeError::invalid_value(self.name(), value))?;
        exchange.set_request_header(self.header.clone(), value);
        Ok(())
    }
}

/// `%{o,name}`: all values of a response header
///
/// Same rendering as [`RequestHeaderAttribute`]. Writing replaces every value
/// of the header on the response.
#[derive(Debug, Clone)]
pub struct ResponseHeaderAttribute {
    header: HeaderName,
}

impl ResponseHeaderAttribute {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl ExchangeAttribute for ResponseHeaderAttribute {
    fn name(&self) -> &'static str {
        "Response header"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        read_header(exchange.response_headers(), &self.header)
    }

    fn write(&self, exchange: &mut dyn Exchange, value: &str) -> Result<(), AttributeError> {
        let value = HeaderValue::from_str(value)
            .map_err(|_| AttributeError::invalid_value(self.name(), value))?;
        exchange.set_response_header(self.header.clone(), value);
        Ok(())
    }
}

/// `%{ALL_REQUEST_HEADERS}`, `%{ALL_RESPONSE_HEADERS}`
///
/// One `name: value` line per header value, in map order.
#[derive(Debug, Clone, Copy)]
pub struct AllHeadersAttribute {
    response: bool,
}

impl AllHeadersAttribute {
    pub fn request() -> Self {
        Self { response: false }
    }

    pub fn response() -> Self {
        Self { response: true }
    }
}

impl ExchangeAttribute for AllHeadersAttribute {
    fn name(&self) -> &'static str {
        if self.response {
            "All response headers"
        } else {
            "All request headers"
        }
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        let headers = if self.response {
            exchange.response_headers()
        } else {
            exchange.request_headers()
        };
        let lines: Vec<String> = headers
            .iter()
            .map(|(k, v)| format!("{}: {}", k, String::from_utf8_lossy(v.as_bytes())))
            .collect();
        Some(lines.join("\n"))
    }
}

pub static ALL_REQUEST_HEADERS: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(AllHeadersAttribute::request()));
pub static ALL_RESPONSE_HEADERS: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(AllHeadersAttribute::response()));
