//! # Parser Module
//!
//! Compiles access-log patterns such as `%h %t "%r" %s %b` into a tree of
//! [`ExchangeAttribute`](crate::attribute::ExchangeAttribute) values.
//!
//! ## Overview
//!
//! [`ExchangeAttributeParser`] scans the pattern one character at a time and
//! splits it into literal runs and directives. Literal runs become constants;
//! each directive is resolved by the [`BuilderRegistry`]. Every piece is then
//! decorated by the configured [`AttributeWrapper`]s and appended to the
//! result. A single resulting attribute is returned as-is;
//! anything else becomes a [`CompositeAttribute`].
//!
//! ## Grammar
//!
//! | Form | Example | Notes |
//! |------|---------|-------|
//! | literal | `GET ` | everything that does not start a directive |
//! | short directive | `%h` | `%` plus one character |
//! | braced directive | `%{i,Host}` | closes at the first `}` |
//! | escape | `%%`, `$$` | literal `%` and `$` |
//! | compat directive | `%<s` | `%<` plus one character |
//! | predicate reference | `${SECURE}` | parsed like `%{...}` |
//!
//! Unknown directives are not an error: a warning is logged and the raw token
//! text is kept as a literal. An unclosed `%{` or `${` fails the whole pattern
//! with [`ParseError::MismatchedBraces`].
//!
//! ## Example
//!
//! ```rust
//! use brrtrouter_accesslog::exchange::HttpExchange;
//! use brrtrouter_accesslog::parser::ExchangeAttributeParser;
//! use http::Method;
//!
//! let parser = ExchangeAttributeParser::standard();
//! let attribute = parser.parse("%m %U%q -> %s").unwrap();
//!
//! let exchange = HttpExchange::builder(Method::GET, "/pets?limit=5").build();
//! assert_eq!(
//!     attribute.read(&exchange).as_deref(),
//!     Some("GET /pets?limit=5 -> 200")
//! );
//! ```

mod builder;
mod builders;
mod error;
mod wrapper;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::attribute::{CompositeAttribute, ConstantAttribute, SharedAttribute};

pub use builder::{AttributeBuilder, BuilderRegistry};
pub use builders::{standard_builders, ExactTokenBuilder, ParameterizedBuilder};
pub use error::ParseError;
pub use wrapper::{AttributeWrapper, QuotingWrapper, SubstituteEmptyWrapper};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    Percent,
    PercentBrace,
    Dollar,
    DollarBrace,
    PercentLt,
}

/// Pattern compiler
///
/// Holds an immutable builder registry and wrapper chain; one parser can
/// compile any number of patterns.
pub struct ExchangeAttributeParser {
    registry: BuilderRegistry,
    wrappers: Vec<Box<dyn AttributeWrapper>>,
}

impl ExchangeAttributeParser {
    pub fn new(registry: BuilderRegistry, wrappers: Vec<Box<dyn AttributeWrapper>>) -> Self {
        Self { registry, wrappers }
    }

    /// Standard builders, no wrappers
    pub fn standard() -> Self {
        Self::new(BuilderRegistry::standard(), Vec::new())
    }

    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    /// Compile `pattern` into a single attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MismatchedBraces`] when a `%{` or `${` directive
    /// is still open at the end of the pattern.
    pub fn parse(&self, pattern: &str) -> Result<SharedAttribute, ParseError> {
        let mut results: Vec<SharedAttribute> = Vec::new();
        let mut current = String::new();
        let mut state = State::Literal;

        for c in pattern.chars() {
            match state {
                State::Literal => {
                    if c == '%' || c == '$' {
                        if !current.is_empty() {
                            results.push(self.wrap(literal(&current)));
                            current.clear();
                        }
                        current.push(c);
                        state = if c == '%' {
                            State::Percent
                        } else {
                            State::Dollar
                        };
                    } else {
                        current.push(c);
                    }
                }
                State::Percent => match c {
                    '{' => {
                        current.push(c);
                        state = State::PercentBrace;
                    }
                    '<' => {
                        current.push(c);
                        state = State::PercentLt;
                    }
                    '%' => {
                        results.push(self.wrap(literal("%")));
                        current.clear();
                        state = State::Literal;
                    }
                    _ => {
                        current.push(c);
                        results.push(self.wrap(self.parse_single_token(&current)));
                        current.clear();
                        state = State::Literal;
                    }
                },
                State::PercentBrace | State::DollarBrace => {
                    current.push(c);
                    if c == '}' {
                        results.push(self.wrap(self.parse_single_token(&current)));
                        current.clear();
                        state = State::Literal;
                    }
                }
                State::Dollar => match c {
                    '{' => {
                        current.push(c);
                        state = State::DollarBrace;
                    }
                    '$' => {
                        results.push(self.wrap(literal("$")));
                        current.clear();
                        state = State::Literal;
                    }
                    _ => {
                        current.push(c);
                        results.push(self.wrap(self.parse_single_token(&current)));
                        current.clear();
                        state = State::Literal;
                    }
                },
                State::PercentLt => {
                    current.push(c);
                    results.push(self.wrap(self.parse_single_token(&current)));
                    current.clear();
                    state = State::Literal;
                }
            }
        }

        if matches!(state, State::PercentBrace | State::DollarBrace) {
            return Err(ParseError::MismatchedBraces {
                pattern: pattern.to_string(),
            });
        }
        // a literal run, or a `%`, `$` or `%<` cut off by the end of the pattern
        if !current.is_empty() {
            results.push(self.wrap(literal(&current)));
        }

        debug!(pattern = %pattern, parts = results.len(), "Compiled attribute pattern");

        if results.len() == 1 {
            if let Some(single) = results.pop() {
                return Ok(single);
            }
        }
        Ok(Arc::new(CompositeAttribute::new(results)))
    }

    /// Resolve one token through the registry.
    ///
    /// Tokens no builder claims become literal constants holding the raw
    /// token text; unknown `%` directives are logged first.
    pub fn parse_single_token(&self, token: &str) -> SharedAttribute {
        if let Some(attribute) = self.registry.build(token) {
            return attribute;
        }
        if token.starts_with('%') {
            warn!(token = %token, "Unknown access log directive, treating it as literal text");
        }
        literal(token)
    }

    fn wrap(&self, attribute: SharedAttribute) -> SharedAttribute {
        self.wrappers
            .iter()
            .fold(attribute, |attribute, wrapper| wrapper.wrap(attribute))
    }
}

fn literal(text: &str) -> SharedAttribute {
    Arc::new(ConstantAttribute::new(text))
}

impl Default for ExchangeAttributeParser {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ExchangeAttributeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeAttributeParser")
            .field("registry", &self.registry)
            .field("wrappers", &self.wrappers.len())
            .finish()
    }
}
