//! OneBot Node Runner
//!
//! This binary serves the OneBot node to a workflow host:
//! - Loads `[onebot]` credentials from `config.toml` (and `config.local.toml`)
//! - Reads JSON-RPC requests line by line from stdin
//! - Writes responses to stdout; logs go to stderr

mod config;
mod server;

use std::sync::Arc;

use anyhow::Result;
use onebot_node::driver::HttpApiClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::server::NodeServer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting OneBot node...");

    let config = config::load(&std::env::current_dir()?)?;
    let client = HttpApiClient::new(&config)?;

    NodeServer::new(Arc::new(client))
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await?;

    info!("OneBot node stopped");
    Ok(())
}
