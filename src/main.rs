use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zoekt_mcp::backend::zoekt::ZoektClient;
use zoekt_mcp::config::Config;
use zoekt_mcp::mcp::server::{McpContext, McpServer};
use zoekt_mcp::paginate::Paginator;

#[derive(Parser, Debug)]
#[command(version, about = "MCP server for paginated Zoekt code search")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: String,

    /// Search backend base URL (overrides the config file)
    #[arg(long, env = "ZOEKT_URL")]
    backend_url: Option<String>,

    /// Backend request timeout in milliseconds (overrides the config file)
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting zoekt-mcp v{}...", env!("CARGO_PKG_VERSION"));

    // 1. Load config
    let mut config = Config::load(&cli.config)?;
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    if let Some(ms) = cli.timeout_ms {
        config.request_timeout_ms = ms;
    }
    config.validate().context("invalid configuration")?;
    let config = Arc::new(config);

    // 2. Init backend client
    let client = ZoektClient::new(&config.backend_url, config.request_timeout())
        .context("Failed to create search backend client")?;
    tracing::info!("Using search backend at {}", config.backend_url);

    // 3. Init MCP Context
    let mcp_ctx = McpContext {
        paginator: Paginator::new(Arc::new(client)),
        config,
    };

    // 4. Start Server
    let server = McpServer::new(mcp_ctx);
    server.start().await?;

    Ok(())
}
