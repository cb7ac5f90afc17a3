//! stellate-purge entry point.
//!
//! Fires purge mutations by hand using the same layered configuration as the
//! response hook. Logging goes to stderr as JSON.

use anyhow::{Result, bail};
use clap::Parser;
use stellate_client::PurgeClient;
use stellate_core::PurgeConfig;
use tracing_subscriber::EnvFilter;

mod args;

use args::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let mut config = PurgeConfig::load()?;
    config.debug |= cli.debug;

    let client = PurgeClient::new(&config)?;

    let outcome = match cli.command {
        Command::Check => {
            tracing::info!(
                endpoint = ?config.service_name.as_deref().map(|s| config.endpoint(s)),
                enabled = client.is_enabled(),
                "configuration loaded"
            );
            if !client.is_enabled() {
                bail!("purging is disabled");
            }
            return Ok(());
        }
        Command::Queries { names } => client.purge_queries(names.as_slice()).await,
        Command::Type { name, id } => client.purge_type_id(&name, id.as_deref()).await,
    };

    outcome?;

    Ok(())
}
