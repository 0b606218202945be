//! Tool-specific error types.

use thiserror::Error;

use crate::store::ApiError;

/// Errors a tool handler can return.
///
/// `Api` and `InvalidArguments` are expected failures: the dispatcher turns
/// them into a `{"error": ...}` result. `Internal` marks a bug and escapes
/// the dispatcher as a [`DispatchError`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// The remote store rejected the call, or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Failures that escape [`Dispatcher::dispatch`](super::Dispatcher::dispatch).
///
/// The message is for logs; callers only ever see a generic failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A handler reported an internal error.
    #[error("Tool '{function}' failed: {message}")]
    Internal { function: String, message: String },

    /// A handler panicked.
    #[error("Tool '{function}' panicked: {message}")]
    Panicked { function: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_is_transparent() {
        let err: ToolError = ApiError::new("Invalid ID.").into();
        assert_eq!(err.to_string(), "Invalid ID.");
    }

    #[test]
    fn test_invalid_arguments_message() {
        let err = ToolError::invalid_arguments("Missing or invalid 'order_id' parameter");
        assert_eq!(
            err.to_string(),
            "Invalid arguments: Missing or invalid 'order_id' parameter"
        );
    }
}
