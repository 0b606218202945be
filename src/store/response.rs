//! Response normalizer.
//!
//! Turns a raw store response into JSON, or into an [`ApiError`] when the
//! status says the call failed.

use serde_json::Value;
use tracing::debug;

use super::error::{ApiError, ApiResult};

/// Normalize a store response.
///
/// - status >= 400: the body's `message` (or `default_message`) and `code`
///   become the error; a body that is not JSON yields
///   `"<default_message>: <status>"`.
/// - otherwise the body is parsed as JSON; an empty body is `null`.
pub async fn normalize_response(
    response: reqwest::Response,
    default_message: &str,
) -> ApiResult<Value> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| {
            ApiError::new(format!("{}: {}", default_message, e.without_url())).with_status(status)
        })?;

    normalize_body(status, &body, default_message)
}

/// Status/body half of [`normalize_response`], kept separate so it can be
/// checked without a live HTTP exchange.
pub(crate) fn normalize_body(status: u16, body: &[u8], default_message: &str) -> ApiResult<Value> {
    if status >= 400 {
        debug!("Store responded with status {}", status);
        return Err(match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(data)) => {
                let message = data
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or(default_message);
                let mut error = ApiError::new(message).with_status(status);
                if let Some(code) = data.get("code").and_then(Value::as_str) {
                    error = error.with_code(code);
                }
                error
            }
            _ => ApiError::new(format!("{}: {}", default_message, status)).with_status(status),
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(format!("{}: invalid JSON in response ({})", default_message, e))
            .with_status(status)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_body_is_parsed() {
        let value = normalize_body(200, br#"[{"id": 1}]"#, "Failed").unwrap();
        assert_eq!(value, json!([{"id": 1}]));
    }

    #[test]
    fn test_empty_success_body_is_null() {
        assert_eq!(normalize_body(204, b"", "Failed").unwrap(), Value::Null);
    }

    #[test]
    fn test_error_body_message_and_code() {
        let body = br#"{"code": "woocommerce_rest_product_invalid_id", "message": "Invalid ID.", "data": {"status": 404}}"#;
        let err = normalize_body(404, body, "Failed to get product 9").unwrap_err();
        assert_eq!(err.message, "Invalid ID.");
        assert_eq!(err.code.as_deref(), Some("woocommerce_rest_product_invalid_id"));
        assert_eq!(err.status, Some(404));
    }

    #[test]
    fn test_error_body_without_message_uses_default() {
        let err = normalize_body(400, br#"{"code": "bad"}"#, "Failed to create order").unwrap_err();
        assert_eq!(err.message, "Failed to create order");
        assert_eq!(err.code.as_deref(), Some("bad"));
    }

    #[test]
    fn test_non_json_error_body() {
        let err = normalize_body(502, b"<html>Bad Gateway</html>", "Failed to get orders").unwrap_err();
        assert_eq!(err.message, "Failed to get orders: 502");
        assert_eq!(err.code, None);
    }

    #[test]
    fn test_invalid_json_success_body() {
        let err = normalize_body(200, b"not json", "Failed to get settings").unwrap_err();
        assert!(err.message.starts_with("Failed to get settings: invalid JSON"));
    }
}
