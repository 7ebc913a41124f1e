//! `tools/call` handling.

use tracing::{error, info};

use super::{INVALID_PARAMS, McpError, McpState, METHOD_NOT_FOUND};
use crate::error::ServiceError;

pub async fn handle_tool_call(
    state: &McpState,
    params: Option<serde_json::Value>,
) -> Result<serde_json::Value, McpError> {
    let params = params.ok_or_else(|| McpError {
        code: INVALID_PARAMS,
        message: "Missing params".to_string(),
    })?;

    let tool_name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError {
            code: INVALID_PARAMS,
            message: "Missing tool name".to_string(),
        })?;

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));

    info!(tool = %tool_name, "MCP tool call");

    match state
        .registry
        .call(state.service.clone(), tool_name, arguments)
        .await
    {
        Ok(result) => Ok(tool_content(&result, false)),
        Err(e @ ServiceError::UnknownTool { .. }) => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: e.to_string(),
        }),
        Err(e @ ServiceError::InvalidRequest { .. }) => Err(McpError {
            code: INVALID_PARAMS,
            message: e.to_string(),
        }),
        Err(e) => {
            error!(tool = %tool_name, code = e.error_code(), error = %e, "Tool call failed");
            let message = serde_json::Value::String(e.to_string());
            Ok(tool_content(&message, true))
        }
    }
}

/// Wrap a tool result in MCP text content blocks.
///
/// A list becomes one block per element; strings are passed through as-is and
/// anything else is rendered as compact JSON.
fn tool_content(result: &serde_json::Value, is_error: bool) -> serde_json::Value {
    let blocks: Vec<serde_json::Value> = match result {
        serde_json::Value::Array(values) => values.iter().map(text_block).collect(),
        other => vec![text_block(other)],
    };

    let mut content = serde_json::json!({ "content": blocks });
    if is_error {
        content["isError"] = serde_json::Value::Bool(true);
    }
    content
}

fn text_block(value: &serde_json::Value) -> serde_json::Value {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    serde_json::json!({ "type": "text", "text": text })
}
