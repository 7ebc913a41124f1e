//! Tool registry shared by the MCP server.
//!
//! Tool names are derived from enum variants via strum, so the name a client
//! calls and the name listed in `tools/list` cannot drift apart. Handlers are
//! registered with a typed argument struct; the registry owns argument parsing
//! and schema generation so handlers only see validated input.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{ServiceError, ServiceResult};
use crate::service::MenuService;

/// All tool names as an exhaustive enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetRestaurantMenu,
    GetCategoryItems,
}

/// Type-erased tool handler
pub type ToolHandler = Arc<
    dyn Fn(Arc<MenuService>, serde_json::Value) -> BoxFuture<'static, ServiceResult<serde_json::Value>>
        + Send
        + Sync,
>;

/// A registered tool
#[derive(Clone)]
pub struct RegisteredTool {
    pub name: ToolName,
    pub description: &'static str,
    /// JSON Schema of the tool arguments
    pub input_schema: serde_json::Value,
    handler: ToolHandler,
}

/// Registry of callable tools, in registration order
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// The input schema is generated from `A`. Registering the same name twice
    /// replaces the earlier handler.
    pub fn register<A, F, Fut, T>(&mut self, name: ToolName, description: &'static str, handler: F)
    where
        A: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(Arc<MenuService>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ServiceResult<T>> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let input_schema = serde_json::to_value(schemars::schema_for!(A))
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));

        let erased: ToolHandler = Arc::new(
            move |service: Arc<MenuService>,
                  arguments: serde_json::Value|
                  -> BoxFuture<'static, ServiceResult<serde_json::Value>> {
                let call = serde_json::from_value::<A>(arguments)
                    .map(|args| handler(service, args))
                    .map_err(|e| ServiceError::InvalidRequest {
                        message: format!("Invalid arguments for {}: {}", name, e),
                    });

                Box::pin(async move {
                    let result = call?.await?;
                    serde_json::to_value(result).map_err(|e| ServiceError::Internal {
                        message: format!("Failed to serialize {} result: {}", name, e),
                    })
                })
            },
        );

        let tool = RegisteredTool {
            name,
            description,
            input_schema,
            handler: erased,
        };

        match self.tools.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a registered tool by enum variant
    pub fn get(&self, name: ToolName) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Get a registered tool by its string name
    pub fn get_by_str(&self, name: &str) -> Option<&RegisteredTool> {
        ToolName::from_str(name).ok().and_then(|n| self.get(n))
    }

    /// Invoke a tool by name with raw JSON arguments
    pub async fn call(
        &self,
        service: Arc<MenuService>,
        name: &str,
        arguments: serde_json::Value,
    ) -> ServiceResult<serde_json::Value> {
        let tool = self.get_by_str(name).ok_or_else(|| ServiceError::UnknownTool {
            name: name.to_string(),
        })?;

        (tool.handler)(service, arguments).await
    }

    /// Get all tools as MCP tool definitions
    pub fn mcp_definitions(&self) -> Vec<McpToolDefinition> {
        self.tools
            .iter()
            .map(|t| McpToolDefinition {
                name: t.name.to_string(),
                description: t.description.to_string(),
                input_schema: t.input_schema.clone(),
            })
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// MCP tool definition structure (for output generation)
#[derive(Debug, Clone, Serialize)]
pub struct McpToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::tools::{MenuArgs, menu_tools};

    fn unconfigured_service() -> Arc<MenuService> {
        Arc::new(MenuService::new(UpstreamConfig::default()).unwrap())
    }

    #[test]
    fn test_tool_name_string_conversion() {
        assert_eq!(
            ToolName::GetRestaurantMenu.to_string(),
            "get_restaurant_menu"
        );
        assert_eq!(ToolName::GetCategoryItems.to_string(), "get_category_items");
        assert_eq!(
            ToolName::from_str("get_category_items").unwrap(),
            ToolName::GetCategoryItems
        );
        assert!(ToolName::from_str("unknown_tool").is_err());
    }

    #[test]
    fn test_menu_tools_definitions() {
        let registry = menu_tools();
        let defs = registry.mcp_definitions();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["get_restaurant_menu", "get_category_items"]);

        let schema = &defs[1].input_schema;
        let required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        for field in ["restaurant_id", "branch_id", "brand_id", "category_name"] {
            assert!(required.contains(&field), "{field} should be required");
        }
        assert_eq!(schema["properties"]["restaurant_id"]["type"], "integer");
        assert_eq!(schema["properties"]["brand_id"]["type"], "string");
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = menu_tools();
        let err = registry
            .call(unconfigured_service(), "delete_menu", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnknownTool { .. }));
    }

    #[tokio::test]
    async fn test_call_with_invalid_arguments() {
        let registry = menu_tools();
        let err = registry
            .call(
                unconfigured_service(),
                "get_restaurant_menu",
                serde_json::json!({ "restaurant_id": "not a number", "branch_id": 1 }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "invalid_request");
        assert!(err.to_string().contains("get_restaurant_menu"));
    }

    #[tokio::test]
    async fn test_call_without_configuration_reports_config_error() {
        let registry = menu_tools();
        let args = serde_json::json!({ "restaurant_id": 255, "branch_id": 2942, "brand_id": "b" });

        let err = registry
            .call(unconfigured_service(), "get_restaurant_menu", args.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MenuFetch(_)));
        assert_eq!(err.error_code(), "configuration_error");

        let mut item_args = args;
        item_args["category_name"] = serde_json::json!("Beverages");
        let err = registry
            .call(unconfigured_service(), "get_category_items", item_args)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ItemFetch(_)));
        assert_eq!(err.error_code(), "configuration_error");
    }

    #[tokio::test]
    async fn test_register_replaces_existing_handler() {
        let mut registry = menu_tools();
        registry.register(
            ToolName::GetRestaurantMenu,
            "Canned categories",
            |_service, _args: MenuArgs| async move {
                Ok::<_, ServiceError>(vec!["Breakfast".to_string()])
            },
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get(ToolName::GetRestaurantMenu).unwrap().description,
            "Canned categories"
        );

        let result = registry
            .call(
                unconfigured_service(),
                "get_restaurant_menu",
                serde_json::json!({ "restaurant_id": 1, "branch_id": 2, "brand_id": "x" }),
            )
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!(["Breakfast"]));
    }
}
