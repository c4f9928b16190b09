use std::fmt;

/// Errors raised while compiling a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `%{` or `${` directive was never closed
    ///
    /// Pattern strings are operator configuration, so there is no recovery:
    /// the whole pattern is rejected.
    MismatchedBraces {
        /// The pattern that failed to compile
        pattern: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MismatchedBraces { pattern } => {
                write!(
                    f,
                    "Pattern error: mismatched braces in '{}'. \
                    Every '%{{' or '${{' directive must be closed with '}}'.",
                    pattern
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}
