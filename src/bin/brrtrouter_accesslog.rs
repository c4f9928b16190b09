use brrtrouter_accesslog::cli::run_cli;
use brrtrouter_accesslog::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    init_logging(&LogConfig::from_env())?;
    run_cli()
}
