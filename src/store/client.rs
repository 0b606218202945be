//! Resource client factory.
//!
//! A [`StoreClient`] is scoped to one site and one credential set. It is
//! cheap to build and is created per tool call; construction fails fast when
//! the site URL or the credentials are missing.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::error::{ApiError, ApiResult};
use super::query::Query;
use super::response::normalize_response;

/// WooCommerce REST namespace.
const WOOCOMMERCE_API_PATH: &str = "wp-json/wc/v3";

/// WordPress core REST namespace.
const WORDPRESS_API_PATH: &str = "wp-json/wp/v2";

/// Which REST API a client (or a tool) talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    /// `wc/v3`, authenticated with consumer key/secret query parameters.
    WooCommerce,
    /// `wp/v2`, authenticated with HTTP basic auth.
    WordPress,
}

#[derive(Clone)]
enum Auth {
    ConsumerKeys {
        consumer_key: String,
        consumer_secret: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

/// HTTP client bound to a site's REST API.
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.base_url)
            .field("flavor", &self.flavor())
            .finish()
    }
}

impl StoreClient {
    /// Build a client for the WooCommerce `wc/v3` API.
    pub fn woocommerce(
        site_url: &str,
        consumer_key: &str,
        consumer_secret: &str,
        timeout: Duration,
    ) -> ApiResult<Self> {
        if site_url.trim().is_empty() {
            return Err(ApiError::new("WordPress site URL not provided"));
        }
        if consumer_key.is_empty() || consumer_secret.is_empty() {
            return Err(ApiError::new("WooCommerce API credentials not provided"));
        }

        Self::build(
            site_url,
            WOOCOMMERCE_API_PATH,
            Auth::ConsumerKeys {
                consumer_key: consumer_key.to_string(),
                consumer_secret: consumer_secret.to_string(),
            },
            timeout,
        )
    }

    /// Build a client for the WordPress `wp/v2` API.
    pub fn wordpress(
        site_url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> ApiResult<Self> {
        if site_url.trim().is_empty() {
            return Err(ApiError::new("WordPress site URL not provided"));
        }
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::new("WordPress credentials not provided"));
        }

        Self::build(
            site_url,
            WORDPRESS_API_PATH,
            Auth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
            timeout,
        )
    }

    fn build(site_url: &str, api_path: &str, auth: Auth, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: format!("{}/{}", site_url.trim().trim_end_matches('/'), api_path),
            auth,
        })
    }

    /// Base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Which API this client talks to.
    pub fn flavor(&self) -> ApiFlavor {
        match self.auth {
            Auth::ConsumerKeys { .. } => ApiFlavor::WooCommerce,
            Auth::Basic { .. } => ApiFlavor::WordPress,
        }
    }

    /// `GET path?query`.
    pub async fn get(&self, path: &str, query: &Query, failure: &str) -> ApiResult<Value> {
        self.send(Method::GET, path, query, None, failure).await
    }

    /// `POST path` with a JSON body.
    pub async fn post(&self, path: &str, body: &Value, failure: &str) -> ApiResult<Value> {
        self.send(Method::POST, path, &Query::new(), Some(body), failure)
            .await
    }

    /// `PUT path` with an optional JSON body.
    pub async fn put(&self, path: &str, body: Option<&Value>, failure: &str) -> ApiResult<Value> {
        self.send(Method::PUT, path, &Query::new(), body, failure).await
    }

    /// `DELETE path?query`.
    pub async fn delete(&self, path: &str, query: &Query, failure: &str) -> ApiResult<Value> {
        self.send(Method::DELETE, path, query, None, failure).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&Value>,
        failure: &str,
    ) -> ApiResult<Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);

        request = match &self.auth {
            Auth::ConsumerKeys {
                consumer_key,
                consumer_secret,
            } => request.query(&[
                ("consumer_key", consumer_key.as_str()),
                ("consumer_secret", consumer_secret.as_str()),
            ]),
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
        };

        if !query.is_empty() {
            request = request.query(query.pairs());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::new(format!("{}: {}", failure, e.without_url())))?;

        normalize_response(response, failure).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_woocommerce_missing_site_url() {
        let err = StoreClient::woocommerce("", "ck", "cs", TIMEOUT).unwrap_err();
        assert_eq!(err.message, "WordPress site URL not provided");
    }

    #[test]
    fn test_woocommerce_missing_credentials() {
        let err = StoreClient::woocommerce("https://shop.example", "", "cs", TIMEOUT).unwrap_err();
        assert_eq!(err.message, "WooCommerce API credentials not provided");
    }

    #[test]
    fn test_wordpress_missing_credentials() {
        let err = StoreClient::wordpress("https://shop.example", "admin", "", TIMEOUT).unwrap_err();
        assert_eq!(err.message, "WordPress credentials not provided");
    }

    #[test]
    fn test_base_urls() {
        let wc = StoreClient::woocommerce("https://shop.example/", "ck", "cs", TIMEOUT).unwrap();
        assert_eq!(wc.base_url(), "https://shop.example/wp-json/wc/v3");
        assert_eq!(wc.flavor(), ApiFlavor::WooCommerce);

        let wp = StoreClient::wordpress("https://shop.example", "admin", "pw", TIMEOUT).unwrap();
        assert_eq!(wp.base_url(), "https://shop.example/wp-json/wp/v2");
        assert_eq!(wp.flavor(), ApiFlavor::WordPress);
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client = StoreClient::woocommerce("https://shop.example", "ck_secret", "cs_secret", TIMEOUT).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("ck_secret"));
        assert!(!debug.contains("cs_secret"));
    }

    #[tokio::test]
    async fn test_get_sends_consumer_keys_and_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/wp-json/wc/v3/products")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("consumer_key".into(), "ck".into()),
                Matcher::UrlEncoded("consumer_secret".into(), "cs".into()),
                Matcher::UrlEncoded("per_page".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1}]"#)
            .create_async()
            .await;

        let client = StoreClient::woocommerce(&server.url(), "ck", "cs", TIMEOUT).unwrap();
        let value = client
            .get("products", &Query::new().with("per_page", 5), "Failed to get products")
            .await
            .unwrap();

        assert_eq!(value, json!([{"id": 1}]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_wordpress_uses_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        // "admin:secret" in base64
        let mock = server
            .mock("POST", "/wp-json/wp/v2/posts")
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .match_body(Matcher::Json(json!({"title": "Hello"})))
            .with_status(201)
            .with_body(r#"{"id": 7}"#)
            .create_async()
            .await;

        let client = StoreClient::wordpress(&server.url(), "admin", "secret", TIMEOUT).unwrap();
        let value = client
            .post("posts", &json!({"title": "Hello"}), "Failed to create post")
            .await
            .unwrap();

        assert_eq!(value["id"], 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_response_is_normalized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/wp-json/wc/v3/coupons/3")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"code": "woocommerce_rest_shop_coupon_invalid_id", "message": "Invalid ID."}"#)
            .create_async()
            .await;

        let client = StoreClient::woocommerce(&server.url(), "ck", "cs", TIMEOUT).unwrap();
        let err = client
            .delete("coupons/3", &Query::new().with("force", false), "Failed to delete coupon 3")
            .await
            .unwrap_err();

        assert_eq!(err.message, "Invalid ID.");
        assert_eq!(err.code.as_deref(), Some("woocommerce_rest_shop_coupon_invalid_id"));
        assert_eq!(err.status, Some(404));
    }

    #[tokio::test]
    async fn test_unreachable_site_is_domain_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let client = StoreClient::woocommerce(
            "http://127.0.0.1:9",
            "ck_SECRETKEY",
            "cs_SECRETVAL",
            Duration::from_millis(500),
        )
        .unwrap();
        let err = client
            .get("products", &Query::new(), "Failed to get products")
            .await
            .unwrap_err();
        assert!(err.message.starts_with("Failed to get products: "));
        assert_eq!(err.status, None);

        // the request URL carries the consumer keys
        assert!(!err.message.contains("ck_SECRETKEY"), "{}", err.message);
        assert!(!err.message.contains("cs_SECRETVAL"), "{}", err.message);
        assert!(!err.message.contains("consumer_key"), "{}", err.message);
    }
}
