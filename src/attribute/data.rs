use super::{AttributeError, ExchangeAttribute};
use crate::exchange::Exchange;

/// `%{d,key}`: a value from the exchange's user data map
///
/// Writable; assigning stores the value under the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDataAttribute {
    key: String,
}

impl UserDataAttribute {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl ExchangeAttribute for UserDataAttribute {
    fn name(&self) -> &'static str {
        "User data"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.data(&self.key).map(str::to_string)
    }

    fn write(&self, exchange: &mut dyn Exchange, value: &str) -> Result<(), AttributeError> {
        exchange.set_data(&self.key, value);
        Ok(())
    }
}

/// `%{X,key}`: a mapped diagnostic context value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdcAttribute {
    key: String,
}

impl MdcAttribute {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl ExchangeAttribute for MdcAttribute {
    fn name(&self) -> &'static str {
        "MDC"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.mdc(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::HttpExchange;
    use http::Method;

    #[test]
    fn test_user_data_round_trip() {
        let tenant = UserDataAttribute::new("tenant");
        let mut exchange = HttpExchange::builder(Method::GET, "/").build();
        assert_eq!(tenant.read(&exchange), None);
        tenant.write(&mut exchange, "acme").unwrap();
        assert_eq!(tenant.read(&exchange).as_deref(), Some("acme"));
    }

    #[test]
    fn test_mdc_is_read_only() {
        let trace = MdcAttribute::new("traceId");
        let mut exchange = HttpExchange::builder(Method::GET, "/")
            .mdc("traceId", "4bf92f35")
            .build();
        assert_eq!(trace.read(&exchange).as_deref(), Some("4bf92f35"));
        assert!(matches!(
            trace.write(&mut exchange, "x"),
            Err(AttributeError::ReadOnly { attribute: "MDC", .. })
        ));
    }
}
