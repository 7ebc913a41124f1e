//! Tool definitions exposed over MCP.
//!
//! This module contains:
//! - Argument types for each tool (their JSON Schemas become the MCP `inputSchema`)
//! - The registry that maps tool names to handlers
//! - `menu_tools`, which registers the restaurant menu tools

use schemars::JsonSchema;
use serde::Deserialize;

pub mod registry;

pub use registry::{McpToolDefinition, ToolName, ToolRegistry};

use crate::menu::MenuQuery;

/// Arguments identifying a restaurant branch menu
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MenuArgs {
    /// The ID of the restaurant
    pub restaurant_id: i64,
    /// The ID of the branch
    pub branch_id: i64,
    /// The ID of the brand
    pub brand_id: String,
}

impl MenuArgs {
    pub fn query(&self) -> MenuQuery {
        MenuQuery {
            restaurant_id: self.restaurant_id,
            branch_id: self.branch_id,
            brand_id: self.brand_id.clone(),
        }
    }
}

/// Arguments for looking up the items of one category
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CategoryItemsArgs {
    /// The ID of the restaurant
    pub restaurant_id: i64,
    /// The ID of the branch
    pub branch_id: i64,
    /// The ID of the brand
    pub brand_id: String,
    /// The name of the category to get items for (case-insensitive)
    pub category_name: String,
}

impl CategoryItemsArgs {
    pub fn query(&self) -> MenuQuery {
        MenuQuery {
            restaurant_id: self.restaurant_id,
            branch_id: self.branch_id,
            brand_id: self.brand_id.clone(),
        }
    }
}

/// Build the registry holding both restaurant menu tools
pub fn menu_tools() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(
        ToolName::GetRestaurantMenu,
        "Fetch restaurant menu categories from the API. Returns the list of category display texts.",
        |service, args: MenuArgs| async move { service.get_restaurant_menu(&args.query()).await },
    );

    registry.register(
        ToolName::GetCategoryItems,
        "Fetch menu items for a specific category from the API. Returns the items with their display text, description, price and image.",
        |service, args: CategoryItemsArgs| async move {
            service
                .get_category_items(&args.query(), &args.category_name)
                .await
        },
    );

    registry
}
