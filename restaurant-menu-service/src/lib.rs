//! Restaurant menu MCP server.
//!
//! Exposes `get_restaurant_menu` and `get_category_items` as MCP tools backed
//! by the ecom restaurant menu API.

pub mod api;
pub mod config;
pub mod error;
pub mod mcp;
pub mod menu;
pub mod service;
pub mod tools;

pub use error::{ServiceError, ServiceResult, UpstreamError};
pub use service::MenuService;
