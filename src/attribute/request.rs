//! Attributes derived from the request line and the requesting principal.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{ExchangeAttribute, SharedAttribute};
use crate::exchange::{protocol_name, Exchange};

/// `%m`, `%{METHOD}`
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMethodAttribute;

impl ExchangeAttribute for RequestMethodAttribute {
    fn name(&self) -> &'static str {
        "Request method"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(exchange.method().as_str().to_string())
    }
}

/// `%H`, `%{PROTOCOL}`
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestProtocolAttribute;

impl ExchangeAttribute for RequestProtocolAttribute {
    fn name(&self) -> &'static str {
        "Request protocol"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(protocol_name(exchange.version()).to_string())
    }
}

/// `%{SCHEME}`
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSchemeAttribute;

impl ExchangeAttribute for RequestSchemeAttribute {
    fn name(&self) -> &'static str {
        "Request scheme"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(exchange.scheme().to_string())
    }
}

/// `%r`, `%{REQUEST_LINE}`: `METHOD uri PROTOCOL`
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLineAttribute;

impl ExchangeAttribute for RequestLineAttribute {
    fn name(&self) -> &'static str {
        "Request line"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(format!(
            "{} {} {}",
            exchange.method(),
            exchange.uri(),
            protocol_name(exchange.version())
        ))
    }
}

/// `%U`, `%{REQUEST_URL}`: the requested path without the query string
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestUrlAttribute;

impl ExchangeAttribute for RequestUrlAttribute {
    fn name(&self) -> &'static str {
        "Request URL"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(exchange.path().to_string())
    }
}

/// `%{REQUEST_PATH}`
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestPathAttribute;

impl ExchangeAttribute for RequestPathAttribute {
    fn name(&self) -> &'static str {
        "Request path"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(exchange.path().to_string())
    }
}

/// `%R`, `%{RELATIVE_PATH}`
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativePathAttribute;

impl ExchangeAttribute for RelativePathAttribute {
    fn name(&self) -> &'static str {
        "Relative path"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(exchange.relative_path().to_string())
    }
}

/// Query string, with or without the leading `?`
///
/// Reads `""` when the request has no query or an empty one.
#[derive(Debug, Clone, Copy)]
pub struct QueryStringAttribute {
    include_question_mark: bool,
}

impl QueryStringAttribute {
    pub fn new(include_question_mark: bool) -> Self {
        Self {
            include_question_mark,
        }
    }
}

impl ExchangeAttribute for QueryStringAttribute {
    fn name(&self) -> &'static str {
        "Query string"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        match exchange.query() {
            None | Some("") => Some(String::new()),
            Some(q) if self.include_question_mark => Some(format!("?{q}")),
            Some(q) => Some(q.to_string()),
        }
    }
}

/// `%u`, `%{REMOTE_USER}`
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteUserAttribute;

impl ExchangeAttribute for RemoteUserAttribute {
    fn name(&self) -> &'static str {
        "Remote user"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.remote_user().map(str::to_string)
    }
}

/// `%l`: remote logical user name from identd, which is never consulted
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentUsernameAttribute;

impl ExchangeAttribute for IdentUsernameAttribute {
    fn name(&self) -> &'static str {
        "Ident username"
    }

    fn read(&self, _exchange: &dyn Exchange) -> Option<String> {
        Some("-".to_string())
    }
}

/// `%I`, `%{THREAD_NAME}`: name of the thread evaluating the attribute
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadNameAttribute;

impl ExchangeAttribute for ThreadNameAttribute {
    fn name(&self) -> &'static str {
        "Thread name"
    }

    fn read(&self, _exchange: &dyn Exchange) -> Option<String> {
        let current = std::thread::current();
        Some(match current.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", current.id()),
        })
    }
}

pub static REQUEST_METHOD: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RequestMethodAttribute));
pub static REQUEST_PROTOCOL: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(RequestProtocolAttribute));
pub static REQUEST_SCHEME: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RequestSchemeAttribute));
pub static REQUEST_LINE: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RequestLineAttribute));
pub static REQUEST_URL: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RequestUrlAttribute));
pub static REQUEST_PATH: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RequestPathAttribute));
pub static RELATIVE_PATH: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RelativePathAttribute));
pub static QUERY_STRING: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(QueryStringAttribute::new(true)));
pub static BARE_QUERY_STRING: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(QueryStringAttribute::new(false)));
pub static REMOTE_USER: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RemoteUserAttribute));
pub static IDENT_USERNAME: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(IdentUsernameAttribute));
pub static THREAD_NAME: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(ThreadNameAttribute));
