//! Forno MCP Server Binary
//!
//! ## Usage
//!
//! ```bash
//! # Persist the cart under ./.forno (default)
//! forno-mcp
//!
//! # Keep the cart in memory only
//! FORNO_STORAGE_BACKEND=memory forno-mcp
//! ```
//!
//! Stdout carries the MCP protocol, so logs always go to stderr.

use std::sync::Arc;

use anyhow::Result;
use forno_core::config::{AppConfig, LoadOptions};
use forno_core::Storefront;
use forno_mcp::{init_tools, shared, FornoMcpServer, ModelContext, ToolRegistry};
use tracing::{info, warn};

fn init_logging(config: &AppConfig) {
    use forno_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    info!(
        event_name = "forno.mcp.config_loaded",
        storage_backend = ?config.storage.backend,
        storage_path = %config.storage.path.display(),
        tools_enabled = config.tools.enabled,
        "configuration loaded"
    );

    let state = shared(Storefront::open(&config.storage));
    let registry = Arc::new(ToolRegistry::new());
    let host = config.tools.enabled.then_some(&*registry as &dyn ModelContext);

    let report = init_tools(host, state);
    if !report.enabled {
        warn!(event_name = "forno.mcp.tools_disabled", "agent tools are disabled; serving no tools");
    }

    FornoMcpServer::new(registry).run_stdio().await
}
