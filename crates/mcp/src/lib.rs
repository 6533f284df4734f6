//! Forno Antico agent tools.
//!
//! This crate exposes the shared storefront (configurator + cart) to AI agents:
//!
//! - `registry`: the `ModelContext` registration surface and the in-process `ToolRegistry` host
//! - `tools`: the ten storefront tools and the registration boundary that turns every
//!   outcome into a result envelope
//! - `install`: idempotent, host-optional tool installation
//! - `server`: an MCP server over stdio backed by the registry
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use forno_core::{config::AppConfig, Storefront};
//! use forno_mcp::{init_tools, shared, FornoMcpServer, ToolRegistry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = shared(Storefront::open(&AppConfig::default().storage));
//!     let registry = Arc::new(ToolRegistry::new());
//!     init_tools(Some(&*registry), state);
//!     FornoMcpServer::new(registry).run_stdio().await
//! }
//! ```

pub mod envelope;
pub mod install;
pub mod registry;
pub mod server;
pub mod tools;

use std::sync::Arc;

use forno_core::Storefront;
use thiserror::Error;
use tokio::sync::Mutex;

pub use envelope::{ContentItem, ErrorCode, ToolResult};
pub use install::{init_tools, InitReport, ToolInstaller};
pub use registry::{ModelContext, RegisteredTool, ToolDefinition, ToolExecutor, ToolRegistry};
pub use server::FornoMcpServer;
pub use tools::{storefront_tools, ToolSuccess, TOOL_NAMES};

/// The storefront every tool call and UI handler works against.
pub type SharedStorefront = Arc<Mutex<Storefront>>;

pub fn shared(storefront: Storefront) -> SharedStorefront {
    Arc::new(Mutex::new(storefront))
}

/// Errors raised inside a tool body.
#[derive(Error, Debug)]
pub enum ToolError {
    /// A semantic rejection carrying a caller-visible code.
    #[error("{code}: {details}")]
    Rejected { code: ErrorCode, details: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ToolError {
    pub fn rejected(code: ErrorCode, details: impl Into<String>) -> Self {
        Self::Rejected { code, details: details.into() }
    }
}
