//! TLS session attributes. All read `None` for plain-text exchanges.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;

use super::{ExchangeAttribute, SharedAttribute};
use crate::exchange::Exchange;

const PEM_LINE_WIDTH: usize = 64;

/// `%{SSL_CIPHER}`
#[derive(Debug, Clone, Copy, Default)]
pub struct SslCipherAttribute;

impl ExchangeAttribute for SslCipherAttribute {
    fn name(&self) -> &'static str {
        "SSL cipher"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        exchange
            .tls_session()
            .map(|tls| tls.cipher_suite.clone())
            .filter(|c| !c.is_empty())
    }
}

/// `%{SSL_CLIENT_CERT}`: the leaf peer certificate as PEM
#[derive(Debug, Clone, Copy, Default)]
pub struct SslClientCertAttribute;

impl ExchangeAttribute for SslClientCertAttribute {
    fn name(&self) -> &'static str {
        "SSL client certificate"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        let der = exchange.tls_session()?.peer_certificates.first()?;
        Some(to_pem(der))
    }
}

/// `%{SSL_SESSION_ID}`: the session id as lower-case hex
#[derive(Debug, Clone, Copy, Default)]
pub struct SslSessionIdAttribute;

impl ExchangeAttribute for SslSessionIdAttribute {
    fn name(&self) -> &'static str {
        "SSL session id"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        let tls = exchange.tls_session()?;
        if tls.session_id.is_empty() {
            return None;
        }
        Some(hex::encode(&tls.session_id))
    }
}

fn to_pem(der: &[u8]) -> String {
    let encoded = STANDARD.encode(der);
    let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
    // base64 output is ASCII, so byte chunks are valid str boundaries
    for line in encoded.as_bytes().chunks(PEM_LINE_WIDTH) {
        pem.push_str(&String::from_utf8_lossy(line));
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----");
    pem
}

pub static SSL_CIPHER: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(SslCipherAttribute));
pub static SSL_CLIENT_CERT: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(SslClientCertAttribute));
pub static SSL_SESSION_ID: Lazy<SharedAttribute> = Lazy::new(|| Arc::new(SslSessionIdAttribute));
