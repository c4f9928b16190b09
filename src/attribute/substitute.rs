use super::{AttributeError, ExchangeAttribute, SharedAttribute};
use crate::exchange::Exchange;

/// Replaces a missing or empty value with a fixed placeholder.
///
/// Writes are forwarded to the wrapped attribute unchanged.
#[derive(Debug, Clone)]
pub struct SubstituteEmptyAttribute {
    inner: SharedAttribute,
    substitute: String,
}

impl SubstituteEmptyAttribute {
    pub fn new(inner: SharedAttribute, substitute: impl Into<String>) -> Self {
        Self {
            inner,
            substitute: substitute.into(),
        }
    }
}

impl ExchangeAttribute for SubstituteEmptyAttribute {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        match self.inner.read(exchange) {
            Some(v) if !v.is_empty() => Some(v),
            _ => Some(self.substitute.clone()),
        }
    }

    fn write(&self, exchange: &mut dyn Exchange, value: &str) -> Result<(), AttributeError> {
        self.inner.write(exchange, value)
    }
}
