//! Attributes describing the response and its timing.

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use once_cell::sync::Lazy;

use super::{AttributeError, ExchangeAttribute, SharedAttribute};
use crate::exchange::Exchange;

/// `%s`, `%{RESPONSE_CODE}`
///
/// Writable: assigning a three digit code replaces the response status.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCodeAttribute;

impl ExchangeAttribute for ResponseCodeAttribute {
    fn name(&self) -> &'static str {
        "Response code"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(exchange.status().as_u16().to_string())
    }

    fn write(&self, exchange: &mut dyn Exchange, value: &str) -> Result<(), AttributeError> {
        let status = value
            .trim()
            .parse::<u16>()
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .ok_or_else(|| AttributeError::invalid_value(self.name(), value))?;
        exchange.set_status(status);
        Ok(())
    }
}

/// `%b`, `%B`, `%{BYTES_SENT}`: response body bytes written
#[derive(Debug, Clone, Copy)]
pub struct BytesSentAttribute {
    dash_if_zero: bool,
}

impl BytesSentAttribute {
    /// With `dash_if_zero`, an empty body renders as `-` instead of `0`
    pub fn new(dash_if_zero: bool) -> Self {
        Self { dash_if_zero }
    }
}

impl ExchangeAttribute for BytesSentAttribute {
    fn name(&self) -> &'static str {
        "Bytes sent"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        let bytes = exchange.bytes_written();
        if self.dash_if_zero && bytes == 0 {
            Some("-".to_string())
        } else {
            Some(bytes.to_string())
        }
    }
}

/// Unit used to render a response time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
}

/// Render an elapsed duration in `unit`.
///
/// Seconds render as `s.cc`: whole seconds, a dot and exactly two fractional
/// digits truncated from whole milliseconds (1234 ms renders as `1.23`, 1239 ms
/// as `1.23` too). The other units render as integer counts.
pub fn format_response_time(elapsed: Duration, unit: TimeUnit) -> String {
    match unit {
        TimeUnit::Nanoseconds => elapsed.as_nanos().to_string(),
        TimeUnit::Microseconds => elapsed.as_micros().to_string(),
        TimeUnit::Milliseconds => elapsed.as_millis().to_string(),
        TimeUnit::Seconds => {
            let millis = elapsed.as_millis();
            let remains = millis % 1000;
            format!(
                "{}.{}{}",
                millis / 1000,
                remains / 100,
                (remains % 100) / 10
            )
        }
    }
}

/// `%D`, `%T`, `%{RESPONSE_TIME}` and friends
///
/// Elapsed time since [`Exchange::request_start`]; `None` when no start was
/// recorded. The first read after the response ended caches its measurement on
/// the exchange, and every later read returns that cached value.
#[derive(Debug, Clone, Copy)]
pub struct ResponseTimeAttribute {
    unit: TimeUnit,
}

impl ResponseTimeAttribute {
    pub fn new(unit: TimeUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }
}

impl ExchangeAttribute for ResponseTimeAttribute {
    fn name(&self) -> &'static str {
        "Response time"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        let start = exchange.request_start()?;
        let elapsed = match exchange.first_response_time() {
            Some(cached) => cached,
            None => {
                let elapsed = start.elapsed();
                if exchange.response_ended() {
                    exchange.record_first_response_time(elapsed);
                }
                elapsed
            }
        };
        Some(format_response_time(elapsed, self.unit))
    }
}

pub static RESPONSE_CODE: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(ResponseCodeAttribute));
pub static BYTES_SENT: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(BytesSentAttribute::new(false)));
pub static BYTES_SENT_DASH: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(BytesSentAttribute::new(true)));
pub static RESPONSE_TIME_NANOS: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(ResponseTimeAttribute::new(TimeUnit::Nanoseconds)));
pub static RESPONSE_TIME_MICROS: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(ResponseTimeAttribute::new(TimeUnit::Microseconds)));
pub static RESPONSE_TIME_MILLIS: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(ResponseTimeAttribute::new(TimeUnit::Milliseconds)));
pub static RESPONSE_TIME_SECONDS: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(ResponseTimeAttribute::new(TimeUnit::Seconds)));
