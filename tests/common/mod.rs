#![allow(dead_code)]

pub mod exchanges {
    use brrtrouter_accesslog::exchange::{HttpExchange, TlsSession};
    use chrono::DateTime;
    use http::header::{CONTENT_TYPE, COOKIE, HOST, REFERER, USER_AGENT};
    use http::{HeaderName, HeaderValue, Method, StatusCode};

    /// A finished `GET /pets?limit=10&tag=cat&tag=dog` from 192.0.2.10
    pub fn pet_listing() -> HttpExchange {
        let mut exchange = HttpExchange::builder(Method::GET, "/pets?limit=10&tag=cat&tag=dog")
            .remote_addr("192.0.2.10:51234".parse().unwrap())
            .local_addr("10.1.0.5:8080".parse().unwrap())
            .received_at(DateTime::parse_from_rfc3339("2024-02-29T23:59:58+01:00").unwrap())
            .request_header(HOST, HeaderValue::from_static("pets.example.com:8080"))
            .request_header(USER_AGENT, HeaderValue::from_static("curl/8.5.0"))
            .request_header(REFERER, HeaderValue::from_static("https://example.com/"))
            .request_header(COOKIE, HeaderValue::from_static("session=s-42; theme=dark"))
            .request_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static("203.0.113.1"),
            )
            .request_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static("198.51.100.7"),
            )
            .response_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .data("tenant", "acme")
            .mdc("traceId", "4bf92f3577b34da6")
            .build();
        exchange.finish(StatusCode::OK, 2326);
        exchange
    }

    /// An HTTPS exchange with a client certificate
    pub fn mutual_tls() -> HttpExchange {
        HttpExchange::builder(Method::POST, "/admin/settings")
            .scheme("https")
            .remote_user("alice")
            .tls(
                TlsSession::new("TLS_AES_128_GCM_SHA256")
                    .with_session_id(vec![0x01, 0xab, 0xff])
                    .with_peer_certificate(vec![0x30, 0x82, 0x01, 0x0a]),
            )
            .status(StatusCode::NO_CONTENT)
            .build()
    }
}

pub mod logs {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    /// Captures formatted log output for the current thread while alive
    pub struct TestLogs {
        buffer: Arc<Mutex<Vec<u8>>>,
        _guard: tracing::subscriber::DefaultGuard,
    }

    #[derive(Clone)]
    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = BufferWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl TestLogs {
        pub fn init() -> Self {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            let subscriber = tracing_subscriber::fmt()
                .with_writer(BufferWriter(Arc::clone(&buffer)))
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .finish();
            let guard = tracing::subscriber::set_default(subscriber);
            Self {
                buffer,
                _guard: guard,
            }
        }

        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
        }

        /// Lines logged at WARN
        pub fn warnings(&self) -> Vec<String> {
            self.contents()
                .lines()
                .filter(|line| line.contains(" WARN "))
                .map(str::to_string)
                .collect()
        }
    }
}
