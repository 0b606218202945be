//! HTTP transport implementation.
//!
//! One path serves both halves of the protocol:
//! - `GET  {path}?client_id=<id>` opens a server-sent event stream. It emits
//!   `event: ready` immediately, then queued `function_call_result` events,
//!   or a keep-alive comment whenever the queue stays idle for the
//!   configured interval.
//! - `POST {path}?client_id=<id>` runs `{"function", "params"}` through the
//!   dispatcher and answers `{"function", "result"}`. When `client_id` names
//!   an open stream the same payload is pushed onto it.
//!
//! `GET /` and `GET /health` are liveness probes.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
    routing::get,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info, instrument, warn};

use super::connections::{ClientConnection, ConnectionManager, StreamEvent, generate_client_id};
use super::events::StreamMessage;
use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::{FunctionCallResult, ToolInvocation};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
    /// Open client streams.
    connections: Arc<ConnectionManager>,
    keep_alive: Duration,
    keep_alive_comment: String,
}

impl AppState {
    pub fn new(server: McpServer, config: &HttpConfig) -> Self {
        Self {
            server,
            connections: Arc::new(ConnectionManager::new()),
            keep_alive: config.keep_alive_interval,
            // SSE comments are single-line
            keep_alive_comment: config.keep_alive_comment.replace(['\r', '\n'], " "),
        }
    }

    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }
}

/// `?client_id=` on both stream and function-call requests.
#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    #[serde(default)]
    pub client_id: Option<String>,
}

impl ClientQuery {
    fn client_id(self) -> Option<String> {
        self.client_id.filter(|id| !id.is_empty())
    }
}

/// Build the axum router for the given state.
pub fn router(state: AppState, config: &HttpConfig) -> Router {
    let mut app = Router::new()
        .route(&config.path, get(handle_stream).post(handle_function_call))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = router(AppState::new(server, &self.config), &self.config);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Stream:   GET  {}?client_id=<id>", self.config.path);
        info!("  → Call:     POST {}?client_id=<id>", self.config.path);
        info!("  → Health:   GET  /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler.
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "MCP Server is running"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// ============================================================================
// Event stream
// ============================================================================

#[instrument(skip_all)]
async fn handle_stream(
    State(state): State<AppState>,
    Query(query): Query<ClientQuery>,
) -> impl IntoResponse {
    let client_id = query.client_id().unwrap_or_else(generate_client_id);
    let connection = state.connections.register(client_id);

    (
        [(header::CACHE_CONTROL, "no-cache")],
        Sse::new(client_stream(
            connection,
            state.keep_alive,
            state.keep_alive_comment,
        )),
    )
}

/// `ready`, then queued messages or keep-alives until the queue closes.
///
/// The connection lives inside the stream, so dropping the response (client
/// gone, write failure) deregisters it.
fn client_stream(
    connection: ClientConnection,
    keep_alive: Duration,
    comment: String,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let ready = stream::once(async { Ok::<_, Infallible>(to_event(StreamMessage::ready())) });

    let messages = stream::unfold(connection, move |mut connection| {
        let comment = comment.clone();
        async move {
            let event = match connection.next_event(keep_alive).await {
                StreamEvent::Message(message) => to_event(message),
                StreamEvent::KeepAlive => {
                    debug!("Keep-alive for client {}", connection.client_id());
                    Event::default().comment(comment)
                }
                StreamEvent::Closed => return None,
            };
            Some((Ok::<_, Infallible>(event), connection))
        }
    });

    ready.chain(messages)
}

fn to_event(message: StreamMessage) -> Event {
    Event::default().event(message.event).data(message.data)
}

// ============================================================================
// Function calls
// ============================================================================

#[instrument(skip_all, fields(function))]
async fn handle_function_call(
    State(state): State<AppState>,
    Query(query): Query<ClientQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            return bad_request(rejection.body_text());
        }
    };

    let mut body = match payload {
        Value::Object(body) if !body.is_empty() => body,
        Value::Null | Value::Object(_) => return bad_request("No data provided"),
        _ => return bad_request("Request body must be a JSON object"),
    };

    let Some(function) = body
        .remove("function")
        .and_then(|f| f.as_str().map(str::to_string))
    else {
        return Json(FunctionCallResult::missing_function()).into_response();
    };
    tracing::Span::current().record("function", function.as_str());

    let params = body.remove("params").unwrap_or(Value::Null);
    info!("Function call: {}", function);

    let mut invocation = ToolInvocation::new(function, params);
    if let Some(client_id) = query.client_id() {
        invocation = invocation.for_client(client_id);
    }
    let client_id = invocation.client_id.clone();

    match state.server.invoke(invocation).await {
        Ok(result) => {
            if let Some(client_id) = client_id {
                deliver(&state.connections, &client_id, &result);
            }
            Json(result).into_response()
        }
        Err(e) => {
            error!("Function call failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

/// Best-effort push of a result onto a client stream.
fn deliver(connections: &ConnectionManager, client_id: &str, result: &FunctionCallResult) {
    match StreamMessage::function_call_result(result) {
        Ok(message) => {
            if connections.enqueue(client_id, message) {
                debug!("Result queued for client {}", client_id);
            } else {
                debug!("Client {} has no open stream, result not queued", client_id);
            }
        }
        Err(e) => error!("Failed to encode result for client {}: {}", client_id, e),
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use mockito::Matcher;
    use tower::ServiceExt;

    use crate::core::Config;
    use crate::domains::tools::definitions::test_support::store_for;
    use crate::domains::tools::{
        ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
    };

    struct Harness {
        app: Router,
        connections: Arc<ConnectionManager>,
    }

    fn harness_with(server: McpServer, keep_alive: Duration) -> Harness {
        let config = HttpConfig {
            keep_alive_interval: keep_alive,
            ..HttpConfig::default()
        };
        let state = AppState::new(server, &config);
        let connections = Arc::clone(state.connections());
        Harness {
            app: router(state, &config),
            connections,
        }
    }

    fn harness(store_url: &str, keep_alive: Duration) -> Harness {
        let mut config = Config::default();
        config.store = store_for(store_url);
        harness_with(McpServer::new(config), keep_alive)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn next_chunk(body: &mut Body) -> String {
        let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
            .await
            .expect("stream produced nothing in time")
            .expect("stream ended")
            .expect("body error");
        let data = frame.into_data().expect("not a data frame");
        String::from_utf8(data.to_vec()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_stream_starts_with_ready() {
        let h = harness("http://127.0.0.1:1", Duration::from_secs(25));

        let response = h
            .app
            .oneshot(get_request("/mcp?client_id=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert!(h.connections.is_registered("abc"));

        let mut body = response.into_body();
        assert_eq!(next_chunk(&mut body).await, "event: ready\ndata: {}\n\n");
    }

    #[tokio::test]
    async fn test_stream_without_client_id_gets_generated_one() {
        let h = harness("http://127.0.0.1:1", Duration::from_secs(25));

        let response = h.app.oneshot(get_request("/mcp")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.connections.len(), 1);
    }

    #[tokio::test]
    async fn test_idle_stream_emits_keep_alive() {
        let h = harness("http://127.0.0.1:1", Duration::from_millis(30));

        let response = h
            .app
            .oneshot(get_request("/mcp?client_id=idle"))
            .await
            .unwrap();
        let mut body = response.into_body();
        next_chunk(&mut body).await;

        assert_eq!(next_chunk(&mut body).await, ": keep-alive\n\n");
        assert_eq!(next_chunk(&mut body).await, ": keep-alive\n\n");
        assert!(h.connections.is_registered("idle"));
    }

    #[tokio::test]
    async fn test_multiline_keep_alive_comment_is_flattened() {
        let config = HttpConfig {
            keep_alive_interval: Duration::from_millis(20),
            keep_alive_comment: "keep\nalive".to_string(),
            ..HttpConfig::default()
        };
        let state = AppState::new(McpServer::new(Config::default()), &config);
        let app = router(state, &config);

        let response = app.oneshot(get_request("/mcp?client_id=x")).await.unwrap();
        let mut body = response.into_body();
        next_chunk(&mut body).await;

        assert_eq!(next_chunk(&mut body).await, ": keep alive\n\n");
    }

    #[tokio::test]
    async fn test_result_delivered_to_stream_and_caller() {
        let mut store = mockito::Server::new_async().await;
        store
            .mock("GET", "/wp-json/wc/v3/products/1")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1,"name":"Widget"}"#)
            .create_async()
            .await;

        let h = harness(&store.url(), Duration::from_secs(25));

        let response = h
            .app
            .clone()
            .oneshot(get_request("/mcp?client_id=abc"))
            .await
            .unwrap();
        let mut stream = response.into_body();
        next_chunk(&mut stream).await;

        let response = h
            .app
            .clone()
            .oneshot(post_request(
                "/mcp?client_id=abc",
                r#"{"function":"get_product","params":{"id":1}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let expected = json!({
            "function": "get_product",
            "result": {"id": 1, "name": "Widget"}
        });
        assert_eq!(json_body(response).await, expected);

        let message = StreamMessage::decode(&next_chunk(&mut stream).await).unwrap();
        assert_eq!(message.event, "function_call_result");
        let delivered: Value = serde_json::from_str(&message.data).unwrap();
        assert_eq!(delivered, expected);
    }

    #[tokio::test]
    async fn test_call_without_client_id_only_answers_caller() {
        let mut store = mockito::Server::new_async().await;
        store
            .mock("GET", "/wp-json/wc/v3/products")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1},{"id":2}]"#)
            .create_async()
            .await;

        let h = harness(&store.url(), Duration::from_secs(25));
        let response = h
            .app
            .oneshot(post_request(
                "/mcp",
                r#"{"function":"list_products","params":{}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"function": "list_products", "result": {"products": [{"id": 1}, {"id": 2}]}})
        );
        assert!(h.connections.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_function_is_200_with_error() {
        let h = harness("http://127.0.0.1:1", Duration::from_secs(25));
        let response = h
            .app
            .oneshot(post_request(
                "/mcp?client_id=nobody",
                r#"{"function":"bogus_fn"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"function": "bogus_fn", "result": {"error": "Function bogus_fn not supported"}})
        );
    }

    #[tokio::test]
    async fn test_missing_function_name() {
        let h = harness("http://127.0.0.1:1", Duration::from_secs(25));
        let response = h
            .app
            .oneshot(post_request("/mcp", r#"{"params":{}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"function": null, "result": {"error": "Function name is required"}})
        );
    }

    #[tokio::test]
    async fn test_bad_bodies_are_400() {
        let h = harness("http://127.0.0.1:1", Duration::from_secs(25));

        let response = h
            .app
            .clone()
            .oneshot(post_request("/mcp", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": "No data provided"})
        );

        let response = h
            .app
            .clone()
            .oneshot(post_request("/mcp", "not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());

        let response = h
            .app
            .oneshot(post_request("/mcp", "[1, 2]"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn explode(_ctx: ToolContext, _params: ToolParams) -> ToolResult<Value> {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_handler_panic_is_500_with_generic_body() {
        let mut registry = ToolRegistry::new();
        registry.register(ToolDescriptor::new("explode", "Always panics", explode));
        let server = McpServer::with_registry(Config::default(), registry);
        let h = harness_with(server, Duration::from_secs(25));

        let response = h
            .app
            .oneshot(post_request("/mcp", r#"{"function":"explode"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn test_disconnect_deregisters_client() {
        let h = harness("http://127.0.0.1:1", Duration::from_secs(25));

        let response = h
            .app
            .clone()
            .oneshot(get_request("/mcp?client_id=gone"))
            .await
            .unwrap();
        let mut body = response.into_body();
        next_chunk(&mut body).await;
        assert!(h.connections.is_registered("gone"));

        drop(body);
        assert!(!h.connections.is_registered("gone"));

        // a departed client still gets the synchronous answer
        let response = h
            .app
            .oneshot(post_request(
                "/mcp?client_id=gone",
                r#"{"function":"tools_list"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await["result"]["tools"].is_array());
    }

    #[tokio::test]
    async fn test_probes() {
        let h = harness("http://127.0.0.1:1", Duration::from_secs(25));

        let response = h.app.clone().oneshot(get_request("/")).await.unwrap();
        assert_eq!(
            json_body(response).await,
            json!({"status": "ok", "message": "MCP Server is running"})
        );

        let response = h.app.oneshot(get_request("/health")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }
}
