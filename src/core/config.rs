//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (optionally through a `.env` file) on top of
//! defaults. The store section is threaded explicitly into every tool call;
//! no handler reads the environment itself.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Target store and credentials.
    pub store: StoreConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Target WordPress/WooCommerce site and the credentials used by default.
///
/// Tools may override any of these per call through their parameters.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Site root, e.g. `https://shop.example.com`.
    pub site_url: Option<String>,

    /// WordPress user for the `wp/v2` API.
    pub username: Option<String>,

    /// WordPress application password.
    pub password: Option<String>,

    /// WooCommerce REST consumer key.
    pub consumer_key: Option<String>,

    /// WooCommerce REST consumer secret.
    pub consumer_secret: Option<String>,

    /// Timeout applied to every outbound REST call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("site_url", &self.site_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field(
                "consumer_key",
                &self.consumer_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "consumer_secret",
                &self.consumer_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl LoggingConfig {
    /// `MCP_LOG_LEVEL`, default `info`.
    pub fn from_env() -> Self {
        Self {
            level: env_string("MCP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl StoreConfig {
    /// Load the store section from the environment.
    pub fn from_env() -> Result<Self> {
        let mut store = Self {
            request_timeout: default_request_timeout(),
            ..Self::default()
        };

        store.site_url = env_string("WORDPRESS_SITE_URL");
        store.username = env_string("WORDPRESS_USERNAME");
        store.password = env_string("WORDPRESS_PASSWORD");
        store.consumer_key = env_string("WOOCOMMERCE_CONSUMER_KEY");
        store.consumer_secret = env_string("WOOCOMMERCE_CONSUMER_SECRET");

        if let Some(secs) = env_parse::<u64>("MCP_REQUEST_TIMEOUT_SECS")? {
            store.request_timeout = Duration::from_secs(secs);
        }

        match &store.site_url {
            Some(url) => info!("Target store: {}", url),
            None => warn!(
                "WORDPRESS_SITE_URL not set - every tool call must pass site_url explicitly"
            ),
        }

        if store.consumer_key.is_none() || store.consumer_secret.is_none() {
            warn!("WooCommerce credentials not set (WOOCOMMERCE_CONSUMER_KEY / WOOCOMMERCE_CONSUMER_SECRET)");
        }

        Ok(store)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "woocommerce-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            store: StoreConfig {
                request_timeout: default_request_timeout(),
                ..StoreConfig::default()
            },
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, ...); the store uses the WordPress/WooCommerce names
    /// (`WORDPRESS_SITE_URL`, `WOOCOMMERCE_CONSUMER_KEY`, ...).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_string("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        config.transport = TransportConfig::from_env()?;
        config.store = StoreConfig::from_env()?;

        Ok(config)
    }
}

/// Read a non-empty environment variable.
pub(crate) fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, failing on unparsable values.
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env_string(key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("{} has an invalid value: {:?}", key, raw))),
        None => Ok(None),
    }
}

/// Read a boolean flag; anything but `false`/`0` counts as true.
pub(crate) fn env_flag(key: &str) -> Option<bool> {
    env_string(key).map(|v| v.to_lowercase() != "false" && v != "0")
}
