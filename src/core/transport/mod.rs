//! Transport layer for the MCP server.
//!
//! - **HTTP**: function calls over POST, results over server-sent event
//!   streams - feature: `http`
//! - **STDIO**: standard MCP over stdin/stdout through rmcp - feature: `stdio`
//!
//! Both hand tool calls to the same dispatcher owned by the MCP server.
//!
//! # Feature Flags
//!
//! - `http` (default): adds axum, tower, tower-http and tokio/net
//! - `stdio` (default): minimal dependencies

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod connections;
#[cfg(feature = "http")]
pub mod events;
#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
#[cfg(feature = "http")]
pub use connections::{ClientConnection, ConnectionManager, StreamEvent};
#[cfg(feature = "http")]
pub use events::StreamMessage;
