//! Transport configuration types.

use serde::{Deserialize, Serialize};
#[cfg(feature = "http")]
use std::time::Duration;

#[cfg(feature = "http")]
use crate::core::config::{env_flag, env_parse};
use crate::core::config::env_string;
use crate::core::error::{Error, Result};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (MCP desktop clients).
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP function calls with server-sent event streams.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path serving both the event stream (GET) and function calls (POST).
    #[serde(default = "default_path")]
    pub path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Idle time after which a stream emits a keep-alive comment.
    #[serde(default = "default_keep_alive_interval")]
    pub keep_alive_interval: Duration,

    /// Text of the keep-alive comment.
    #[serde(default = "default_keep_alive_comment")]
    pub keep_alive_comment: String,
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "http")]
fn default_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "http")]
fn default_keep_alive_interval() -> Duration {
    Duration::from_secs(25)
}

#[cfg(feature = "http")]
fn default_keep_alive_comment() -> String {
    "keep-alive".to_string()
}

#[cfg(feature = "http")]
const DEFAULT_PORT: u16 = 8000;

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "http")]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(all(not(feature = "http"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: default_host(),
            path: default_path(),
            enable_cors: default_cors(),
            keep_alive_interval: default_keep_alive_interval(),
            keep_alive_comment: default_keep_alive_comment(),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Load the HTTP settings from the environment.
    ///
    /// `PORT` (as set by hosting platforms) wins over `MCP_HTTP_PORT`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = env_parse::<u16>("PORT")? {
            config.port = port;
        } else if let Some(port) = env_parse::<u16>("MCP_HTTP_PORT")? {
            config.port = port;
        }
        if let Some(host) = env_string("MCP_HTTP_HOST") {
            config.host = host;
        }
        if let Some(path) = env_string("MCP_HTTP_PATH") {
            if !path.starts_with('/') {
                return Err(Error::config(format!(
                    "MCP_HTTP_PATH must start with '/': {:?}",
                    path
                )));
            }
            config.path = path;
        }
        if let Some(enable_cors) = env_flag("MCP_HTTP_CORS") {
            config.enable_cors = enable_cors;
        }
        if let Some(secs) = env_parse::<u64>("MCP_KEEP_ALIVE_SECS")? {
            if secs == 0 {
                return Err(Error::config("MCP_KEEP_ALIVE_SECS must be greater than 0"));
            }
            config.keep_alive_interval = Duration::from_secs(secs);
        }
        if let Some(comment) = env_string("MCP_KEEP_ALIVE_COMMENT") {
            if comment.contains(['\r', '\n']) {
                return Err(Error::config(
                    "MCP_KEEP_ALIVE_COMMENT must be a single line",
                ));
            }
            config.keep_alive_comment = comment;
        }

        Ok(config)
    }

    /// Socket address string, `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an HTTP transport config.
    #[cfg(feature = "http")]
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT` selects `http` or `stdio`; unset means the default.
    pub fn from_env() -> Result<Self> {
        let transport = env_string("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "http")]
            "http" => Ok(Self::Http(HttpConfig::from_env()?)),
            #[cfg(feature = "stdio")]
            "stdio" => Ok(Self::Stdio),
            #[cfg(feature = "http")]
            "" => Ok(Self::Http(HttpConfig::from_env()?)),
            #[cfg(all(not(feature = "http"), feature = "stdio"))]
            "" => Ok(Self::Stdio),
            other => Err(Error::config(format!(
                "Unsupported MCP_TRANSPORT {:?} (enabled: {})",
                other,
                enabled_transports()
            ))),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP + SSE on {}{}", cfg.address(), cfg.path),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}

fn enabled_transports() -> &'static str {
    if cfg!(all(feature = "http", feature = "stdio")) {
        "http, stdio"
    } else if cfg!(feature = "http") {
        "http"
    } else {
        "stdio"
    }
}
