use super::{join_values, ExchangeAttribute};
use crate::exchange::Exchange;

/// `%{q,name}`: all values of a query parameter
///
/// Unlike header attributes, a parameter with no values reads as `""` rather
/// than `None`. Log formats built on this attribute rely on the difference, so
/// it is kept as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameterAttribute {
    parameter: String,
}

impl QueryParameterAttribute {
    pub fn new(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
        }
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }
}

impl ExchangeAttribute for QueryParameterAttribute {
    fn name(&self) -> &'static str {
        "Query parameter"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        let values = exchange.query_params(&self.parameter);
        if values.is_empty() {
            Some(String::new())
        } else {
            Some(join_values(&values))
        }
    }
}
