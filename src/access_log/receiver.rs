use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::info;

/// Destination for rendered access log lines
pub trait AccessLogReceiver: Send + Sync {
    fn log_message(&self, message: &str);
}

/// Emits every line as a `tracing` event at INFO level
///
/// Events use the `access_log` target and carry the configured category as a
/// field, so subscribers can route them separately from application logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingAccessLogReceiver {
    category: String,
}

impl TracingAccessLogReceiver {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl AccessLogReceiver for TracingAccessLogReceiver {
    fn log_message(&self, message: &str) {
        info!(target: "access_log", category = %self.category, "{}", message);
    }
}

/// Keeps lines in memory; handy for tests and for embedding hosts that ship
/// lines elsewhere
#[derive(Default)]
pub struct MemoryAccessLogReceiver {
    lines: Mutex<Vec<String>>,
}

impl MemoryAccessLogReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines received so far, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AccessLogReceiver for MemoryAccessLogReceiver {
    fn log_message(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

impl fmt::Debug for MemoryAccessLogReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAccessLogReceiver")
            .field("lines", &self.lines().len())
            .finish()
    }
}
