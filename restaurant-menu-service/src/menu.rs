//! Restaurant menu API integration.
//!
//! This module talks to the ecom `restaurant-menu` endpoint and reduces its
//! nested response to the two shapes the tools return: a list of category
//! labels, and the items of one category.

mod categories;
mod client;
mod items;
mod labels;
mod responses;

pub use categories::category_labels;
pub use client::{MenuQuery, UpstreamMenuClient};
pub use items::{CategoryLookup, find_category_items, labels_match};
pub use labels::{PREFERRED_LANGUAGE, resolve_label};
pub use responses::{Item, LocalizedText, MenuCategory, MenuData, MenuItem, MenuType};
