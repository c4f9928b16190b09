use super::{ExchangeAttribute, SharedAttribute};
use crate::exchange::Exchange;

/// Concatenation of several attributes
///
/// Children that read as `None` contribute nothing. A composite is always
/// read-only.
#[derive(Debug, Clone)]
pub struct CompositeAttribute {
    parts: Vec<SharedAttribute>,
}

impl CompositeAttribute {
    pub fn new(parts: Vec<SharedAttribute>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[SharedAttribute] {
        &self.parts
    }
}

impl ExchangeAttribute for CompositeAttribute {
    fn name(&self) -> &'static str {
        "Composite"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        let mut out = String::new();
        for part in &self.parts {
            if let Some(value) = part.read(exchange) {
                out.push_str(&value);
            }
        }
        Some(out)
    }
}
