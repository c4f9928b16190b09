use super::{AttributeError, ExchangeAttribute};
use crate::exchange::Exchange;

/// `%{c,name}`: a request cookie
///
/// Writing sets a cookie of the same name on the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCookieAttribute {
    cookie: String,
}

impl RequestCookieAttribute {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

impl ExchangeAttribute for RequestCookieAttribute {
    fn name(&self) -> &'static str {
        "Request cookie"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.request_cookie(&self.cookie)
    }

    fn write(&self, exchange: &mut dyn Exchange, value: &str) -> Result<(), AttributeError> {
        exchange.set_response_cookie(&self.cookie, value);
        Ok(())
    }
}

/// `%{resp-cookie,name}`: a cookie set on the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCookieAttribute {
    cookie: String,
}

impl ResponseCookieAttribute {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

impl ExchangeAttribute for ResponseCookieAttribute {
    fn name(&self) -> &'static str {
        "Response cookie"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.response_cookie(&self.cookie)
    }

    fn write(&self, exchange: &mut dyn Exchange, value: &str) -> Result<(), AttributeError> {
        exchange.set_response_cookie(&self.cookie, value);
        Ok(())
    }
}
