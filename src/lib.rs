//! # BRRTRouter Access Log
//!
//! **brrtrouter-accesslog** compiles Apache-style access log patterns such as
//! `%h %l %u %t "%r" %s %b` into reusable attribute trees and evaluates them
//! against HTTP exchanges.
//!
//! ## Overview
//!
//! A pattern is compiled once, at configuration time, into a tree of
//! [`ExchangeAttribute`](attribute::ExchangeAttribute) values. The tree holds
//! no per-request state and is shared behind an `Arc`, so one compiled pattern
//! serves every request on every thread. Each evaluation borrows the request's
//! [`Exchange`](exchange::Exchange) for the duration of the read.
//!
//! ## Architecture
//!
//! - **[`exchange`]** - The `Exchange` capability trait and the `HttpExchange` implementation
//! - **[`attribute`]** - One attribute per token type, plus composite and decorator attributes
//! - **[`parser`]** - The pattern tokenizer, the builder registry and attribute wrappers
//! - **[`access_log`]** - Named patterns, the access log handler and its receivers
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `brrtrouter-accesslog` command-line tool
//!
//! ### Compile and Evaluate
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Config as AccessLogConfig
//!     participant Handler as AccessLogHandler
//!     participant Parser as ExchangeAttributeParser
//!     participant Registry as BuilderRegistry
//!     participant Tree as Attribute tree
//!     participant Receiver as AccessLogReceiver
//!
//!     Config->>Handler: from_config(&config)
//!     Handler->>Parser: parse("%h %t \"%r\" %s")
//!     loop every token
//!         Parser->>Registry: build(token)
//!         Registry-->>Parser: attribute or no match
//!         Parser->>Parser: apply wrappers
//!     end
//!     Parser-->>Handler: CompositeAttribute
//!
//!     Note over Handler,Receiver: per request
//!     Handler->>Handler: exclude pattern check
//!     Handler->>Tree: read(&exchange)
//!     Tree-->>Handler: rendered line
//!     Handler->>Receiver: log_message(line)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtrouter_accesslog::exchange::HttpExchange;
//! use brrtrouter_accesslog::parser::ExchangeAttributeParser;
//! use http::header::USER_AGENT;
//! use http::{HeaderValue, Method, StatusCode};
//!
//! let parser = ExchangeAttributeParser::standard();
//! let pattern = parser.parse("\"%r\" %s %B \"%{i,User-Agent}\"").unwrap();
//!
//! let mut exchange = HttpExchange::builder(Method::GET, "/pets?limit=10")
//!     .request_header(USER_AGENT, HeaderValue::from_static("curl/8.5.0"))
//!     .build();
//! exchange.finish(StatusCode::OK, 2048);
//!
//! assert_eq!(
//!     pattern.read(&exchange).as_deref(),
//!     Some("\"GET /pets?limit=10 HTTP/1.1\" 200 2048 \"curl/8.5.0\"")
//! );
//! ```
//!
//! ## Pattern Tokens
//!
//! | Token | Value |
//! |-------|-------|
//! | `%a` `%A` | remote / local IP |
//! | `%b` `%B` | bytes sent (`-` for zero) / bytes sent |
//! | `%h` | remote host |
//! | `%H` `%m` `%r` | protocol / method / request line |
//! | `%s` | status code |
//! | `%t` | `[dd/Mon/yyyy:HH:MM:SS +zzzz]` |
//! | `%D` `%T` | response time in ms / seconds |
//! | `%U` `%q` | path / query string |
//! | `%{i,name}` `%{o,name}` | request / response header |
//! | `%{c,name}` | request cookie |
//! | `%{q,name}` | query parameter |
//! | `%{time,FORMAT}` | request time in a strftime format |
//!
//! The [`parser`] module documents the grammar; `brrtrouter-accesslog tokens`
//! lists every builder.
//!
//! ## Access Logging
//!
//! ```yaml
//! enabled: true
//! pattern: combined
//! log_to_file: true
//! log_directory: /var/log/pet_store
//! exclude_pattern: "/health|/metrics"
//! ```
//!
//! Load it with [`AccessLogConfig::from_file`](access_log::AccessLogConfig::from_file),
//! build an [`AccessLogHandler`](access_log::AccessLogHandler) and call
//! `log(&exchange)` once the response has been written.

pub mod access_log;
pub mod attribute;
pub mod cli;
pub mod exchange;
pub mod logging;
pub mod parser;

pub use access_log::{AccessLogConfig, AccessLogError, AccessLogHandler, AccessLogReceiver};
pub use attribute::{AttributeError, ExchangeAttribute, SharedAttribute};
pub use exchange::{Exchange, HttpExchange};
pub use parser::{BuilderRegistry, ExchangeAttributeParser, ParseError};
