use crate::access_log::{resolve_pattern, AccessLogConfig, AccessLogHandler};
use crate::exchange::{Exchange, HttpExchange};
use crate::parser::{BuilderRegistry, ExchangeAttributeParser};
use anyhow::{anyhow, Context};
use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand};
use http::{HeaderName, HeaderValue, Method, StatusCode, Version};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Command-line interface for access log patterns
///
/// Compiles patterns, renders them against a described request and writes
/// lines through a configured access log.
#[derive(Parser)]
#[command(name = "brrtrouter-accesslog")]
#[command(about = "BRRTRouter access log pattern tool", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a pattern and report whether it is valid
    Check {
        /// Named pattern (common, combined, long) or a literal pattern
        pattern: String,
    },
    /// Render a pattern against the request described by the flags
    Render {
        /// Named pattern (common, combined, long) or a literal pattern
        pattern: String,

        #[command(flatten)]
        exchange: ExchangeArgs,
    },
    /// Log one request through the access log described by a config file
    Log {
        /// YAML access log configuration; defaults plus environment when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        exchange: ExchangeArgs,
    },
    /// List the token builders in the order they are consulted
    Tokens,
}

/// Flags describing the request/response pair a pattern is rendered against
#[derive(Args, Debug, Clone)]
pub struct ExchangeArgs {
    /// Request method
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Request URI, path plus optional query string
    #[arg(long, default_value = "/")]
    pub uri: String,

    /// Request protocol: HTTP/1.0, HTTP/1.1 or HTTP/2.0
    #[arg(long, default_value = "HTTP/1.1")]
    pub protocol: String,

    #[arg(long, default_value = "http")]
    pub scheme: String,

    /// Response status code
    #[arg(long, default_value_t = 200)]
    pub status: u16,

    /// Response body size in bytes
    #[arg(long, default_value_t = 0)]
    pub bytes: u64,

    /// Request header, repeatable
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Response header, repeatable
    #[arg(long = "response-header", value_name = "NAME:VALUE")]
    pub response_headers: Vec<String>,

    /// Client socket address
    #[arg(long)]
    pub remote_addr: Option<SocketAddr>,

    /// Server socket address
    #[arg(long)]
    pub local_addr: Option<SocketAddr>,

    /// Authenticated user name
    #[arg(long)]
    pub remote_user: Option<String>,

    /// Exchange user data, repeatable
    #[arg(long = "data", value_name = "KEY=VALUE")]
    pub data: Vec<String>,

    /// Time the request was received, RFC 3339 (default: now)
    #[arg(long)]
    pub received_at: Option<String>,

    /// Time taken to produce the response, in milliseconds
    #[arg(long)]
    pub elapsed_ms: Option<u64>,
}

impl ExchangeArgs {
    /// Build the exchange these flags describe
    pub fn to_exchange(&self) -> anyhow::Result<HttpExchange> {
        let method = Method::from_bytes(self.method.as_bytes())
            .with_context(|| format!("Invalid method: {}", self.method))?;
        let status = StatusCode::from_u16(self.status)
            .with_context(|| format!("Invalid status code: {}", self.status))?;

        let mut builder = HttpExchange::builder(method, &self.uri)
            .version(parse_version(&self.protocol)?)
            .scheme(&self.scheme)
            .status(status)
            .bytes_written(self.bytes)
            .response_ended(true);

        for header in &self.headers {
            let (name, value) = parse_header(header)?;
            builder = builder.request_header(name, value);
        }
        for header in &self.response_headers {
            let (name, value) = parse_header(header)?;
            builder = builder.response_header(name, value);
        }
        for entry in &self.data {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", entry))?;
            builder = builder.data(key, value);
        }
        if let Some(addr) = self.remote_addr {
            builder = builder.remote_addr(addr);
        }
        if let Some(addr) = self.local_addr {
            builder = builder.local_addr(addr);
        }
        if let Some(user) = &self.remote_user {
            builder = builder.remote_user(user);
        }
        if let Some(at) = &self.received_at {
            let at: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(at)
                .with_context(|| format!("Invalid --received-at timestamp: {}", at))?;
            builder = builder.received_at(at);
        }
        if let Some(ms) = self.elapsed_ms {
            let start = Instant::now()
                .checked_sub(Duration::from_millis(ms))
                .ok_or_else(|| anyhow!("--elapsed-ms is out of range: {}", ms))?;
            builder = builder.request_start(start);
        }
        Ok(builder.build())
    }
}

fn parse_version(protocol: &str) -> anyhow::Result<Version> {
    match protocol.to_ascii_uppercase().as_str() {
        "HTTP/0.9" => Ok(Version::HTTP_09),
        "HTTP/1.0" => Ok(Version::HTTP_10),
        "HTTP/1.1" => Ok(Version::HTTP_11),
        "HTTP/2" | "HTTP/2.0" => Ok(Version::HTTP_2),
        "HTTP/3" | "HTTP/3.0" => Ok(Version::HTTP_3),
        _ => Err(anyhow!("Unsupported protocol: {}", protocol)),
    }
}

fn parse_header(header: &str) -> anyhow::Result<(HeaderName, HeaderValue)> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected NAME:VALUE, got '{}'", header))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .with_context(|| format!("Invalid header name: {}", name))?;
    let value = HeaderValue::from_str(value.trim())
        .with_context(|| format!("Invalid header value for {}", name))?;
    Ok((name, value))
}

/// Parse the process arguments and run the selected command
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

/// Run a parsed command, writing its output to `out`
pub fn run(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Check { pattern } => {
            let resolved = resolve_pattern(pattern);
            ExchangeAttributeParser::standard()
                .parse(resolved)
                .with_context(|| format!("Pattern '{}' does not compile", pattern))?;
            writeln!(out, "ok: {}", resolved)?;
        }
        Commands::Render { pattern, exchange } => {
            let resolved = resolve_pattern(pattern);
            let attribute = ExchangeAttributeParser::standard()
                .parse(resolved)
                .with_context(|| format!("Pattern '{}' does not compile", pattern))?;
            let exchange = exchange.to_exchange()?;
            writeln!(out, "{}", attribute.read(&exchange).unwrap_or_default())?;
        }
        Commands::Log { config, exchange } => {
            let mut settings = match config {
                Some(path) => AccessLogConfig::from_file(path)?,
                None => AccessLogConfig::default(),
            };
            settings.apply_env_overrides();
            let Some(handler) = AccessLogHandler::from_config(&settings)
                .context("Failed to set up access log")?
            else {
                writeln!(out, "access log disabled")?;
                return Ok(());
            };
            let exchange = exchange.to_exchange()?;
            if !handler.log(&exchange) {
                writeln!(out, "excluded: {}", exchange.uri())?;
            }
        }
        Commands::Tokens => {
            for name in BuilderRegistry::standard().names() {
                writeln!(out, "{}", name)?;
            }
        }
    }
    Ok(())
}
