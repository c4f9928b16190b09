/// TLS details of the connection an exchange arrived on.
///
/// Certificates are kept DER encoded, leaf first, exactly as the TLS stack
/// hands them over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSession {
    /// Negotiated cipher suite name (e.g. `TLS_AES_128_GCM_SHA256`)
    pub cipher_suite: String,
    /// Session identifier, empty when the stack does not expose one
    pub session_id: Vec<u8>,
    /// Peer certificate chain in DER, leaf first
    pub peer_certificates: Vec<Vec<u8>>,
}

impl TlsSession {
    pub fn new(cipher_suite: impl Into<String>) -> Self {
        Self {
            cipher_suite: cipher_suite.into(),
            ..Self::default()
        }
    }

    pub fn with_session_id(mut self, id: impl Into<Vec<u8>>) -> Self {
        self.session_id = id.into();
        self
    }

    pub fn with_peer_certificate(mut self, der: impl Into<Vec<u8>>) -> Self {
        self.peer_certificates.push(der.into());
        self
    }
}
