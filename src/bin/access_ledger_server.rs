use access_ledger::logging::LoggingSystem;
use access_ledger::{load_node_config, AccessLedgerHttpServer, AccessNode};
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Command line options for the access ledger server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the node configuration file (.toml or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the HTTP server to, overriding the configuration
    #[arg(long)]
    bind: Option<String>,
}

/// Main entry point for the access ledger HTTP server.
///
/// # Environment Variables
///
/// * `ACCESS_LEDGER_CONFIG` - Config file path when `--config` is absent
///   (default: config/access_ledger.toml)
/// * `ACCESS_LEDGER_*` - Per-setting overrides, see `access_ledger::config`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_node_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }

    LoggingSystem::init_with_config(&config.log)?;
    info!("Starting access ledger server...");

    let node = AccessNode::new(&config)?;
    info!("Node loaded from {}", config.storage_path.display());

    let server = AccessLedgerHttpServer::new(node, &config.bind_address)
        .with_cors_origins(config.cors_allowed_origins.clone());
    server.run().await?;

    Ok(())
}
