use std::fmt::Write;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local};
use once_cell::sync::Lazy;

use super::{ExchangeAttribute, SharedAttribute};
use crate::exchange::Exchange;

/// Common Log Format timestamp, e.g. `10/Oct/2000:13:55:36 -0700`
pub const COMMON_LOG_DATE_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// `%t`, `%{DATE_TIME}` and `%{time,FORMAT}`
///
/// Formats the time the request was received, or the current local time when
/// the exchange does not record one. Without a custom format the output is
/// the bracketed Common Log Format date; `FORMAT` is a strftime string and is
/// rendered without brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeAttribute {
    format: Option<String>,
}

impl DateTimeAttribute {
    /// Bracketed Common Log Format timestamp
    pub fn common() -> Self {
        Self { format: None }
    }

    /// Custom strftime format; `None` if the format has invalid specifiers
    pub fn with_format(format: &str) -> Option<Self> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return None;
        }
        Some(Self {
            format: Some(format.to_string()),
        })
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    fn render(&self, at: &DateTime<FixedOffset>) -> Option<String> {
        let mut out = String::new();
        match &self.format {
            None => write!(out, "[{}]", at.format(COMMON_LOG_DATE_FORMAT)).ok()?,
            Some(format) => write!(out, "{}", at.format(format)).ok()?,
        }
        Some(out)
    }
}

impl ExchangeAttribute for DateTimeAttribute {
    fn name(&self) -> &'static str {
        "Date time"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        let at = exchange
            .received_at()
            .unwrap_or_else(|| Local::now().fixed_offset());
        self.render(&at)
    }
}

pub static DATE_TIME: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(DateTimeAttribute::common()));
