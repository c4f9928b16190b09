//! Attributes describing the connection the request arrived on.

use std::sync::Arc;

use http::header::HOST;
use once_cell::sync::Lazy;

use super::{ExchangeAttribute, SharedAttribute};
use crate::exchange::Exchange;

/// `%a`, `%{REMOTE_IP}`
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteIpAttribute;

impl ExchangeAttribute for RemoteIpAttribute {
    fn name(&self) -> &'static str {
        "Remote IP"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.remote_addr().map(|a| a.ip().to_string())
    }
}

/// `%h`, `%{REMOTE_HOST}`
///
/// Host names are never resolved, so this reads the peer address like `%a`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteHostAttribute;

impl ExchangeAttribute for RemoteHostAttribute {
    fn name(&self) -> &'static str {
        "Remote host"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.remote_addr().map(|a| a.ip().to_string())
    }
}

/// `%A`, `%{LOCAL_IP}`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalIpAttribute;

impl ExchangeAttribute for LocalIpAttribute {
    fn name(&self) -> &'static str {
        "Local IP"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.local_addr().map(|a| a.ip().to_string())
    }
}

/// `%p`, `%{LOCAL_PORT}`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPortAttribute;

impl ExchangeAttribute for LocalPortAttribute {
    fn name(&self) -> &'static str {
        "Local port"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange.local_addr().map(|a| a.port().to_string())
    }
}

/// `%v`, `%{LOCAL_SERVER_NAME}`
///
/// Host name from the `Host` header without its port, falling back to the
/// local IP.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalServerNameAttribute;

impl ExchangeAttribute for LocalServerNameAttribute {
    fn name(&self) -> &'static str {
        "Local server name"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        match host_header(exchange) {
            Some(host) => Some(strip_port(&host).to_string()),
            None => exchange.local_addr().map(|a| a.ip().to_string()),
        }
    }
}

/// `%{HOST_AND_PORT}`
///
/// The `Host` header as sent, falling back to the local `ip:port`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostAndPortAttribute;

impl ExchangeAttribute for HostAndPortAttribute {
    fn name(&self) -> &'static str {
        "Host and port"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        host_header(exchange).or_else(|| exchange.local_addr().map(|a| a.to_string()))
    }
}

/// `%{SECURE}` and the legacy `${SECURE}`: `true` or `false`
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureExchangeAttribute;

impl ExchangeAttribute for SecureExchangeAttribute {
    fn name(&self) -> &'static str {
        "Secure"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        Some(exchange.is_secure().to_string())
    }
}

fn host_header(exchange: &dyn Exchange) -> Option<String> {
    exchange
        .request_headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `example.com:8080` -> `example.com`, `[::1]:8080` -> `[::1]`
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

pub static REMOTE_IP: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RemoteIpAttribute));
pub static REMOTE_HOST: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(RemoteHostAttribute));
pub static LOCAL_IP: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(LocalIpAttribute));
pub static LOCAL_PORT: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(LocalPortAttribute));
pub static LOCAL_SERVER_NAME: Lazy<SharedAttribute> =
    Lazy::new(|| Arc::new(LocalServerNameAttribute));
pub static HOST_AND_PORT: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(HostAndPortAttribute));
pub static SECURE: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(SecureExchangeAttribute));
