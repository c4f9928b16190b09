//! # Access Log Module
//!
//! Renders one line per exchange from a compiled pattern and hands it to a
//! receiver.
//!
//! ## Named Patterns
//!
//! | Name | Pattern |
//! |------|---------|
//! | `common` | `%h %l %u %t "%r" %s %b` |
//! | `combined` | `common` plus `"%{i,Referer}" "%{i,User-Agent}"` |
//! | `long` | `%r` then every request header on its own line |
//!
//! Any other value is compiled as a pattern in its own right.
//!
//! ## Receivers
//!
//! - [`TracingAccessLogReceiver`] emits `tracing` events (default)
//! - [`FileAccessLogReceiver`] appends to a file with optional daily rotation
//! - [`MemoryAccessLogReceiver`] keeps lines in memory
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use brrtrouter_accesslog::access_log::{AccessLogHandler, MemoryAccessLogReceiver};
//! use brrtrouter_accesslog::exchange::HttpExchange;
//! use http::Method;
//!
//! let receiver = Arc::new(MemoryAccessLogReceiver::new());
//! let handler =
//!     AccessLogHandler::new(Arc::clone(&receiver) as _, "%m %U %s", Some("/health")).unwrap();
//!
//! handler.log(&HttpExchange::builder(Method::GET, "/pets").build());
//! handler.log(&HttpExchange::builder(Method::GET, "/health").build());
//!
//! assert_eq!(receiver.lines(), vec!["GET /pets 200"]);
//! ```

mod config;
mod error;
mod file;
mod receiver;

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::attribute::SharedAttribute;
use crate::exchange::Exchange;
use crate::parser::{BuilderRegistry, ExchangeAttributeParser, SubstituteEmptyWrapper};

pub use config::AccessLogConfig;
pub use error::AccessLogError;
pub use file::FileAccessLogReceiver;
pub use receiver::{AccessLogReceiver, MemoryAccessLogReceiver, TracingAccessLogReceiver};

pub const COMMON_PATTERN: &str = "%h %l %u %t \"%r\" %s %b";
pub const COMBINED_PATTERN: &str =
    "%h %l %u %t \"%r\" %s %b \"%{i,Referer}\" \"%{i,User-Agent}\"";
pub const LONG_PATTERN: &str = "%r\n%{ALL_REQUEST_HEADERS}";

/// Expand a named pattern; anything else is returned unchanged
pub fn resolve_pattern(pattern: &str) -> &str {
    match pattern {
        "common" => COMMON_PATTERN,
        "combined" => COMBINED_PATTERN,
        "long" => LONG_PATTERN,
        other => other,
    }
}

/// Compiled access log pattern bound to a receiver
///
/// Missing values render as `-`. The compiled tree is shared, so one handler
/// can log exchanges from any number of threads.
pub struct AccessLogHandler {
    receiver: Arc<dyn AccessLogReceiver>,
    pattern: String,
    attribute: SharedAttribute,
    exclude: Option<Regex>,
}

impl AccessLogHandler {
    /// Compile `pattern` (named or literal) and the optional exclude regex.
    ///
    /// # Errors
    ///
    /// Returns [`AccessLogError::Pattern`] for a pattern with unclosed braces
    /// and [`AccessLogError::InvalidExcludePattern`] for a bad regex.
    pub fn new(
        receiver: Arc<dyn AccessLogReceiver>,
        pattern: &str,
        exclude: Option<&str>,
    ) -> Result<Self, AccessLogError> {
        let resolved = resolve_pattern(pattern);
        let parser = ExchangeAttributeParser::new(
            BuilderRegistry::standard(),
            vec![Box::new(SubstituteEmptyWrapper::new("-"))],
        );
        let attribute = parser.parse(resolved)?;

        let exclude = exclude
            .map(|expr| {
                // The whole path has to match, not just a substring
                Regex::new(&format!("^(?:{})$", expr)).map_err(|source| {
                    AccessLogError::InvalidExcludePattern {
                        pattern: expr.to_string(),
                        source,
                    }
                })
            })
            .transpose()?;

        debug!(
            pattern = %resolved,
            exclude = exclude.is_some(),
            "Access log handler created"
        );
        Ok(Self {
            receiver,
            pattern: resolved.to_string(),
            attribute,
            exclude,
        })
    }

    /// Build the receiver the configuration asks for, then the handler.
    ///
    /// Returns `Ok(None)` when `enabled` is off; no receiver is created and
    /// no log file is opened in that case.
    ///
    /// # Errors
    ///
    /// Any error from [`AccessLogHandler::new`], plus
    /// [`AccessLogError::Io`] when the log file cannot be opened.
    pub fn from_config(config: &AccessLogConfig) -> Result<Option<Self>, AccessLogError> {
        if !config.enabled {
            debug!("Access log disabled");
            return Ok(None);
        }
        let receiver: Arc<dyn AccessLogReceiver> = if config.log_to_file {
            Arc::new(FileAccessLogReceiver::new(
                config.directory(),
                &config.base_file_name,
                &config.log_suffix,
                config.rotate,
            )?)
        } else {
            Arc::new(TracingAccessLogReceiver::new(config.category.clone()))
        };
        Self::new(receiver, &config.pattern, config.exclude_pattern.as_deref()).map(Some)
    }

    /// The expanded pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude
            .as_ref()
            .map(|re| re.is_match(path))
            .unwrap_or(false)
    }

    /// Render the line for `exchange` without logging it
    pub fn render(&self, exchange: &dyn Exchange) -> String {
        self.attribute.read(exchange).unwrap_or_default()
    }

    /// Log `exchange` unless its path is excluded. Returns whether a line
    /// was written.
    pub fn log(&self, exchange: &dyn Exchange) -> bool {
        if self.is_excluded(exchange.path()) {
            return false;
        }
        self.receiver.log_message(&self.render(exchange));
        true
    }
}

impl fmt::Debug for AccessLogHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLogHandler")
            .field("pattern", &self.pattern)
            .field("exclude", &self.exclude.as_ref().map(Regex::as_str))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::HttpExchange;
    use http::header::{REFERER, USER_AGENT};
    use http::{HeaderValue, Method};

    fn memory_handler(
        pattern: &str,
        exclude: Option<&str>,
    ) -> (AccessLogHandler, Arc<MemoryAccessLogReceiver>) {
        let receiver = Arc::new(MemoryAccessLogReceiver::new());
        let handler = AccessLogHandler::new(
            Arc::clone(&receiver) as Arc<dyn AccessLogReceiver>,
            pattern,
            exclude,
        )
        .unwrap();
        (handler, receiver)
    }

    #[test]
    fn test_resolve_named_patterns() {
        assert_eq!(resolve_pattern("common"), COMMON_PATTERN);
        assert_eq!(resolve_pattern("combined"), COMBINED_PATTERN);
        assert_eq!(resolve_pattern("long"), LONG_PATTERN);
        assert_eq!(resolve_pattern("%s"), "%s");
    }

    #[test]
    fn test_missing_values_render_dash() {
        let (handler, _) = memory_handler("combined", None);
        let exchange = HttpExchange::builder(Method::GET, "/pets")
            .remote_addr("10.0.0.7:52100".parse().unwrap())
            .build();
        let line = handler.render(&exchange);
        assert!(line.starts_with("10.0.0.7 - - ["));
        assert!(line.ends_with("\"GET /pets HTTP/1.1\" 200 - \"-\" \"-\""));
    }

    #[test]
    fn test_combined_headers() {
        let (handler, _) = memory_handler("combined", None);
        let exchange = HttpExchange::builder(Method::GET, "/")
            .request_header(REFERER, HeaderValue::from_static("https://example.com/"))
            .request_header(USER_AGENT, HeaderValue::from_static("curl/8.0"))
            .build();
        assert!(handler
            .render(&exchange)
            .ends_with("\"https://example.com/\" \"curl/8.0\""));
    }

    #[test]
    fn test_exclude_matches_whole_path() {
        let (handler, receiver) = memory_handler("%U", Some("/health|/metrics"));
        assert!(!handler.log(&HttpExchange::builder(Method::GET, "/health").build()));
        assert!(handler.log(&HttpExchange::builder(Method::GET, "/health/deep").build()));
        assert!(handler.log(&HttpExchange::builder(Method::GET, "/api/metrics").build()));
        assert_eq!(receiver.lines(), vec!["/health/deep", "/api/metrics"]);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let receiver: Arc<dyn AccessLogReceiver> = Arc::new(MemoryAccessLogReceiver::new());
        let err = AccessLogHandler::new(receiver, "%s", Some("(unclosed")).unwrap_err();
        assert!(matches!(err, AccessLogError::InvalidExcludePattern { .. }));
    }

    #[test]
    fn test_pattern_error_propagates() {
        let receiver: Arc<dyn AccessLogReceiver> = Arc::new(MemoryAccessLogReceiver::new());
        let err = AccessLogHandler::new(receiver, "%{i,Host", None).unwrap_err();
        assert!(matches!(err, AccessLogError::Pattern(_)));
    }

    #[test]
    fn test_from_config_disabled_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AccessLogConfig {
            log_to_file: true,
            log_directory: Some(dir.path().to_path_buf()),
            ..AccessLogConfig::default()
        };
        assert!(AccessLogHandler::from_config(&config).unwrap().is_none());
        assert!(!dir.path().join("access.log").exists());
    }

    #[test]
    fn test_from_config_uses_tracing_receiver_when_enabled() {
        let config = AccessLogConfig {
            enabled: true,
            ..AccessLogConfig::default()
        };
        let handler = AccessLogHandler::from_config(&config).unwrap().unwrap();
        assert_eq!(handler.pattern(), COMMON_PATTERN);
        assert!(handler.log(&HttpExchange::builder(Method::GET, "/").build()));
    }
}
