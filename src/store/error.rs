//! Domain error raised when the remote store rejects a call.

use thiserror::Error;

/// Result type for store operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// A remote API rejection.
///
/// Carries the message reported by WooCommerce/WordPress (or a default one
/// when the body had none), the machine-readable `code` when present, and
/// the HTTP status when the error came from a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable message.
    pub message: String,

    /// Machine error code such as `woocommerce_rest_product_invalid_id`.
    pub code: Option<String>,

    /// HTTP status of the failed response, if any.
    pub status: Option<u16>,
}

impl ApiError {
    /// Create an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            status: None,
        }
    }

    /// Attach a machine error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}
