//! Command-line configuration.

use clap::Parser;
use pms_core::ClientConfig;

/// Check a property-management API deployment against its published
/// contract: every endpoint on its happy path and its 401/404 paths.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "pms-conformance", version, about)]
pub struct Config {
    /// Base URL of the deployment, e.g. `https://api.vendor.example/v1`.
    #[arg(long)]
    pub base_url: String,

    /// API key sent in the `x-api-key` header.
    #[arg(long)]
    pub api_key: String,

    /// Emit client and scenario logs on stderr (filtered by `RUST_LOG`).
    #[arg(long)]
    pub log: bool,
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, &self.api_key).with_header(
            "user-agent",
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        )
    }
}
