use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::error;

use mcp_mattermost::Config;
use mcp_mattermost::cache::UserCache;
use mcp_mattermost::mattermost::MattermostClient;
use mcp_mattermost::mcp::server::McpServer;

/// MCP server exposing Mattermost search, users, channels and threads over stdio
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional configuration file (TOML, YAML or JSON)
    #[arg(env = "MATTERMOST_MCP_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    init_logging()?;

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    // One user cache for the whole process, shared by every tool call
    let user_cache = Arc::new(UserCache::new());
    let client = Arc::new(MattermostClient::new(&config, user_cache)?);

    let mcp_server = McpServer::new(client);

    // Set up graceful shutdown
    let shutdown_signal = tokio::signal::ctrl_c();

    tokio::select! {
        result = mcp_server.run() => {
            if let Err(e) = result {
                error!("MCP server error: {}", e);
                return Err(e);
            }
        }
        _ = shutdown_signal => {}
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    // Support both LOG_LEVEL and RUST_LOG environment variables
    let filter = if let Ok(rust_log) = std::env::var("RUST_LOG") {
        tracing_subscriber::EnvFilter::try_new(rust_log)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    } else if let Ok(log_level) = std::env::var("LOG_LEVEL") {
        let level_str = match log_level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "error" => "error",
            _ => "warn",
        };
        tracing_subscriber::EnvFilter::new(level_str)
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout is reserved for the protocol
        .compact()
        .with_target(false)
        .init();

    Ok(())
}
