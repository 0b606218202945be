//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all layers: tool dispatch, the transports and configuration loading.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Unexpected failure while dispatching a tool call.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] crate::domains::tools::DispatchError),

    /// Transport failure (bind, serve, protocol).
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
