//! MCP server over the SSE transport.
//!
//! `GET /sse` opens an event stream whose first event names the endpoint to
//! post JSON-RPC messages to. Responses to those messages are delivered on the
//! stream. A POST without a `session_id` gets its response inline instead,
//! which keeps the endpoint usable from plain HTTP clients.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response, Sse, sse::Event},
    routing::{get, post},
};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::service::MenuService;
use crate::tools::ToolRegistry;

mod handlers;
mod session;
mod tools;

pub use session::{SessionGuard, SessionManager};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "RestaurantMenuAPI";

/// MCP protocol revision implemented by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server state
pub struct McpState {
    pub service: Arc<MenuService>,
    pub registry: Arc<ToolRegistry>,
    pub sessions: Arc<SessionManager>,
}

/// Build the MCP router
pub fn mcp_router(
    service: Arc<MenuService>,
    registry: Arc<ToolRegistry>,
    sessions: Arc<SessionManager>,
) -> Router {
    let state = Arc::new(McpState {
        service,
        registry,
        sessions,
    });

    Router::new()
        .route("/sse", get(mcp_sse_handler))
        .route("/messages", post(mcp_message_handler))
        .route("/messages/", post(mcp_message_handler))
        .with_state(state)
}

/// MCP SSE handler - opens a session stream
async fn mcp_sse_handler(
    State(state): State<Arc<McpState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (session_id, mut rx) = state.sessions.open();
    info!(session_id = %session_id, "MCP client connected");

    let endpoint = format!("/messages/?session_id={}", session_id);
    let guard = SessionGuard::new(state.sessions.clone(), session_id);

    let stream = async_stream::stream! {
        let _guard = guard;
        yield Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint));
        while let Some(message) = rx.recv().await {
            yield Ok(Event::default().event("message").data(message));
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

#[derive(Debug, Deserialize)]
struct SessionParams {
    session_id: Option<String>,
}

/// MCP message handler - handles JSON-RPC requests and notifications
async fn mcp_message_handler(
    State(state): State<Arc<McpState>>,
    Query(params): Query<SessionParams>,
    body: String,
) -> Response {
    let session_id = params.session_id;

    if let Some(id) = &session_id
        && !state.sessions.contains(id)
    {
        warn!(session_id = %id, "Message for unknown MCP session");
        return ServiceError::SessionNotFound {
            session_id: id.clone(),
        }
        .into_response();
    }

    let response = match parse_request(&body) {
        Ok(request) => match request.id.clone() {
            Some(id) => McpResponse::from_result(id, dispatch(&state, request).await),
            None => {
                debug!(method = %request.method, "MCP notification received");
                return StatusCode::ACCEPTED.into_response();
            }
        },
        Err(response) => response,
    };

    let Some(session_id) = session_id else {
        return Json(response).into_response();
    };

    let delivered = serde_json::to_string(&response)
        .map_err(|e| ServiceError::Internal {
            message: format!("Failed to serialize MCP response: {}", e),
        })
        .and_then(|message| state.sessions.send(&session_id, message));

    match delivered {
        Ok(()) => (StatusCode::ACCEPTED, "Accepted").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Decode a JSON-RPC request body.
///
/// Malformed JSON is a parse error (-32700). Well-formed JSON that is not a
/// request object is an invalid request (-32600), answered with the body's
/// `id` when it has one.
fn parse_request(body: &str) -> Result<McpRequest, McpResponse> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        McpResponse::from_result(
            serde_json::Value::Null,
            Err(McpError {
                code: PARSE_ERROR,
                message: format!("Parse error: {}", e),
            }),
        )
    })?;

    let id = value.get("id").cloned().unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value).map_err(|e| {
        McpResponse::from_result(
            id,
            Err(McpError {
                code: INVALID_REQUEST,
                message: format!("Invalid request: {}", e),
            }),
        )
    })
}

/// Route a JSON-RPC request to its method handler
pub(crate) async fn dispatch(
    state: &McpState,
    request: McpRequest,
) -> Result<serde_json::Value, McpError> {
    debug!(method = %request.method, "MCP request received");

    match request.method.as_str() {
        "initialize" => handlers::handle_initialize(state).await,
        "ping" => Ok(serde_json::json!({})),
        "tools/list" => handlers::handle_tools_list(state).await,
        "tools/call" => tools::handle_tool_call(state, request.params).await,
        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
        }),
    }
}

// JSON-RPC error codes
pub(crate) const PARSE_ERROR: i32 = -32700;
pub(crate) const INVALID_REQUEST: i32 = -32600;
pub(crate) const METHOD_NOT_FOUND: i32 = -32601;
pub(crate) const INVALID_PARAMS: i32 = -32602;
pub(crate) const INTERNAL_ERROR: i32 = -32603;

// MCP Protocol Types

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct McpRequest {
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<serde_json::Value>,
    method: String,
    #[serde(default)]
    params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct McpResponse {
    jsonrpc: String,
    id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

impl McpResponse {
    fn from_result(id: serde_json::Value, result: Result<serde_json::Value, McpError>) -> Self {
        match result {
            Ok(data) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(data),
                error: None,
            },
            Err(error) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(error),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct McpError {
    code: i32,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::tools::menu_tools;
    use serde_json::json;

    fn test_state() -> McpState {
        McpState {
            service: Arc::new(MenuService::new(UpstreamConfig::default()).unwrap()),
            registry: Arc::new(menu_tools()),
            sessions: Arc::new(SessionManager::new()),
        }
    }

    fn request(method: &str, params: serde_json::Value) -> McpRequest {
        serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let result = dispatch(&test_state(), request("initialize", json!({})))
            .await
            .unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_tools_list_has_both_tools() {
        let result = dispatch(&test_state(), request("tools/list", json!({})))
            .await
            .unwrap();
        let names: Vec<_> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["get_restaurant_menu", "get_category_items"]);
        assert!(result["tools"][0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let err = dispatch(&test_state(), request("resources/list", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ping() {
        let result = dispatch(&test_state(), request("ping", json!(null)))
            .await
            .unwrap();
        assert_eq!(result, json!({}));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let response = parse_request("{ not json").unwrap_err();
        assert_eq!(response.id, serde_json::Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[test]
    fn test_request_without_method_is_invalid_request() {
        let response = parse_request(r#"{ "jsonrpc": "2.0", "id": 3 }"#).unwrap_err();
        assert_eq!(response.id, json!(3));
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);

        let response = parse_request("[1, 2]").unwrap_err();
        assert_eq!(response.id, serde_json::Value::Null);
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn test_well_formed_request_parses() {
        let request = parse_request(r#"{ "jsonrpc": "2.0", "id": "a", "method": "ping" }"#).unwrap();
        assert_eq!(request.method, "ping");
        assert_eq!(request.id, Some(json!("a")));
    }

    #[test]
    fn test_response_serialization_omits_empty_side() {
        let ok = McpResponse::from_result(json!(7), Ok(json!({ "a": 1 })));
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value, json!({ "jsonrpc": "2.0", "id": 7, "result": { "a": 1 } }));

        let err = McpResponse::from_result(
            json!("x"),
            Err(McpError {
                code: INVALID_PARAMS,
                message: "bad".to_string(),
            }),
        );
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({ "jsonrpc": "2.0", "id": "x", "error": { "code": -32602, "message": "bad" } })
        );
    }
}
