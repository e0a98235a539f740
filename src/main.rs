//! DateTime MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server exposing the current date and time
//! over stdio.

use clap::Parser;

use datetime_mcp_server::config::{Config, LOG_LEVEL_ENV};
use datetime_mcp_server::mcp::server::{McpServer, ERROR_PREFIX};

/// DateTime MCP Server
#[derive(Parser)]
#[command(name = "datetime-mcp-server")]
#[command(author, version, about = "DateTime MCP Server - current date and time over the Model Context Protocol")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = LOG_LEVEL_ENV)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::new()?;
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level)?;
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level.parse::<tracing::Level>()?.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting {} v{}", config.server_name, config.server_version);

    // Create and run MCP server
    let mut server = McpServer::new(&config);
    match server.run_stdio().await {
        Ok(reason) => {
            tracing::info!("Server stopped: {:?}", reason);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("{} {}", ERROR_PREFIX, e);
            std::process::exit(1);
        }
    }
}
