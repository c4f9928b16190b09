use super::ExchangeAttribute;
use crate::exchange::Exchange;

/// Literal text from a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantAttribute {
    value: String,
}

impl ConstantAttribute {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl ExchangeAttribute for ConstantAttribute {
    fn name(&self) -> &'static str {
        "Constant"
    }

    fn read(&self, _exchange: &dyn Exchange) -> Option<String> {
        Some(self.value.clone())
    }
}
