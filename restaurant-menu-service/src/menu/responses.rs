//! Response types for the upstream restaurant menu API.
//!
//! Only the fields the tools consume are modelled; everything else in the
//! document is ignored. A JSON `null` or a value of the wrong type is treated
//! the same as an absent field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// The `data` object of a restaurant menu response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuData {
    #[serde(default, deserialize_with = "lenient")]
    pub menu_type: Option<Vec<MenuType>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuType {
    #[serde(default, deserialize_with = "lenient")]
    pub menu_category: Option<Vec<MenuCategory>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuCategory {
    #[serde(default, deserialize_with = "lenient")]
    pub category_display_text: Option<String>,

    /// Localized overrides of the display text
    #[serde(default, deserialize_with = "lenient")]
    pub category_display_text_v1: Option<Vec<LocalizedText>>,

    #[serde(default, deserialize_with = "lenient")]
    pub cat_items: Option<Vec<MenuItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItem {
    #[serde(default, deserialize_with = "lenient")]
    pub item_display_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub item_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub item_image: Option<String>,
}

/// Decode a field, falling back to absent when its value has the wrong type
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Prices arrive as numbers or as numeric strings
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let price = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(price)
}

impl MenuData {
    /// All category objects in document order, across every menu group
    pub fn categories(&self) -> impl Iterator<Item = &MenuCategory> {
        self.menu_type
            .iter()
            .flatten()
            .flat_map(|menu| menu.menu_category.iter().flatten())
    }
}

/// A menu item as returned to tool callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub display_text: String,
    pub description: String,
    pub price: f64,
    /// Image URL, or empty when the item has none
    pub image: String,
}

impl From<&MenuItem> for Item {
    fn from(item: &MenuItem) -> Self {
        Self {
            display_text: item.item_display_text.clone().unwrap_or_default(),
            description: item.item_description.clone().unwrap_or_default(),
            price: item.price.unwrap_or(0.0),
            image: item.item_image.clone().unwrap_or_default(),
        }
    }
}
