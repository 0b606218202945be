//! WooCommerce MCP Server Library
//!
//! Exposes WooCommerce and WordPress REST operations as named tools, callable
//! over HTTP (with results mirrored onto server-sent event streams) or over
//! standard MCP STDIO.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and transports
//!   - **transport/http**: `GET /mcp` event streams, `POST /mcp` function calls
//!   - **transport/connections**: per-client FIFO queues
//! - **domains**
//!   - **tools**: registry, dispatcher and the per-resource tool definitions
//! - **store**: REST client factory, query builder, response normalizer
//!
//! # Example
//!
//! ```rust,no_run
//! use woocommerce_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone());
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod store;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
