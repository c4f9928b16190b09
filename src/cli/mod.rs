//! # CLI Module
//!
//! Command-line access to the pattern compiler and the access log.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Compile a pattern and report unclosed braces:
//!
//! ```bash
//! brrtrouter-accesslog check '%h %l %u %t "%r" %s %b'
//! brrtrouter-accesslog check combined
//! ```
//!
//! ### `render`
//!
//! Evaluate a pattern against a request described by flags:
//!
//! ```bash
//! brrtrouter-accesslog render '%m %U%q %s %D' \
//!     --method POST --uri '/pets?dry_run=true' --status 201 --elapsed-ms 12
//! ```
//!
//! ### `log`
//!
//! Send one request through the access log a YAML file configures (see
//! [`AccessLogConfig`](crate::access_log::AccessLogConfig)):
//!
//! ```bash
//! brrtrouter-accesslog log --config access-log.yaml --uri /pets --bytes 512
//! ```
//!
//! ### `tokens`
//!
//! List the token builders in consultation order.

mod commands;


pub use commands::{run, run_cli, Cli, Commands, ExchangeArgs};
