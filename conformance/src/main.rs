//! # pms-conformance entry point
//!
//! Parses flags, compiles the schemas, then runs every scenario against the
//! configured deployment, printing the report on stdout.

use clap::Parser;
use pms_conformance::{Checker, Config, SchemaSet};
use pms_core::BlockingClient;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log);

    let schemas = SchemaSet::compile()?;
    let client = BlockingClient::new(config.client_config());
    tracing::info!(base_url = client.base_url(), "starting conformance run");

    let stdout = std::io::stdout();
    Checker::new(&client, &schemas).run_all(stdout.lock())?;
    Ok(())
}

/// Logs are off unless `--log` is given; then `RUST_LOG` applies, defaulting
/// to `debug`.
fn init_tracing(enabled: bool) {
    let filter = if enabled {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("off")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
