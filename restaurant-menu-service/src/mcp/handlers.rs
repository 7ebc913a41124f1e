//! MCP lifecycle and discovery handlers.

use serde::Serialize;

use super::{McpError, McpState, PROTOCOL_VERSION, SERVER_NAME};

const INSTRUCTIONS: &str = "Restaurant menu lookup. Use get_restaurant_menu to list the \
categories of a branch menu, then get_category_items with one of those category names \
to see its items.";

#[derive(Debug, Serialize)]
struct McpServerInfo {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct McpCapabilities {
    tools: ToolsCapability,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolsCapability {
    list_changed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult {
    protocol_version: &'static str,
    capabilities: McpCapabilities,
    server_info: McpServerInfo,
    instructions: &'static str,
}

pub async fn handle_initialize(_state: &McpState) -> Result<serde_json::Value, McpError> {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION,
        capabilities: McpCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
        },
        server_info: McpServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: INSTRUCTIONS,
    };

    serde_json::to_value(result).map_err(|e| McpError {
        code: super::INTERNAL_ERROR,
        message: format!("Failed to serialize initialize result: {}", e),
    })
}

pub async fn handle_tools_list(state: &McpState) -> Result<serde_json::Value, McpError> {
    Ok(serde_json::json!({ "tools": state.registry.mcp_definitions() }))
}
