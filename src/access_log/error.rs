use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::parser::ParseError;

/// Errors raised while setting up access logging
#[derive(Debug)]
pub enum AccessLogError {
    /// The log pattern did not compile
    Pattern(ParseError),
    /// The exclude pattern is not a valid regular expression
    InvalidExcludePattern {
        /// The rejected expression
        pattern: String,
        source: regex::Error,
    },
    /// The log file or its directory could not be opened, written or renamed
    Io {
        /// The file the operation was acting on
        path: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for AccessLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLogError::Pattern(err) => write!(f, "Access log configuration error: {}", err),
            AccessLogError::InvalidExcludePattern { pattern, source } => {
                write!(
                    f,
                    "Access log configuration error: invalid exclude pattern '{}': {}",
                    pattern, source
                )
            }
            AccessLogError::Io { path, source } => {
                write!(f, "Access log I/O error on {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AccessLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccessLogError::Pattern(err) => Some(err),
            AccessLogError::InvalidExcludePattern { source, .. } => Some(source),
            AccessLogError::Io { source, .. } => Some(source),
        }
    }
}

impl From<ParseError> for AccessLogError {
    fn from(err: ParseError) -> Self {
        AccessLogError::Pattern(err)
    }
}
