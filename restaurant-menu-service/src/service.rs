//! Restaurant menu service.
//!
//! `MenuService` is what the tools call. It owns the upstream client and
//! turns raw menu documents into tool results.

use tracing::{error, info, warn};

use crate::config::UpstreamConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::menu::{Item, MenuQuery, UpstreamMenuClient, category_labels, find_category_items};

/// Main service struct
pub struct MenuService {
    pub client: UpstreamMenuClient,
}

impl MenuService {
    /// Create a new service instance
    pub fn new(config: UpstreamConfig) -> ServiceResult<Self> {
        let client = UpstreamMenuClient::new(config).map_err(|e| ServiceError::Config {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client })
    }

    /// Whether every upstream credential is present
    pub fn is_configured(&self) -> bool {
        self.client.config().missing_vars().is_empty()
    }

    /// Category labels of a restaurant menu, in menu order
    pub async fn get_restaurant_menu(&self, query: &MenuQuery) -> ServiceResult<Vec<String>> {
        info!(
            restaurant_id = query.restaurant_id,
            branch_id = query.branch_id,
            brand_id = %query.brand_id,
            "Fetching menu categories"
        );

        let data = self.client.fetch_menu(query).await.map_err(|e| {
            error!(
                restaurant_id = query.restaurant_id,
                branch_id = query.branch_id,
                brand_id = %query.brand_id,
                error = %e,
                "Error fetching restaurant menu"
            );
            ServiceError::MenuFetch(e)
        })?;

        let categories = category_labels(&data);
        info!(count = categories.len(), "Found categories");

        Ok(categories)
    }

    /// Items of the named category.
    ///
    /// Fails with [`ServiceError::CategoryNotFound`] both when no category
    /// matches and when the matching category has no items.
    pub async fn get_category_items(
        &self,
        query: &MenuQuery,
        category_name: &str,
    ) -> ServiceResult<Vec<Item>> {
        info!(
            restaurant_id = query.restaurant_id,
            branch_id = query.branch_id,
            brand_id = %query.brand_id,
            category = %category_name,
            "Fetching category items"
        );

        let data = self.client.fetch_menu(query).await.map_err(|e| {
            error!(
                restaurant_id = query.restaurant_id,
                branch_id = query.branch_id,
                brand_id = %query.brand_id,
                category = %category_name,
                error = %e,
                "Error fetching category items"
            );
            ServiceError::ItemFetch(e)
        })?;

        let lookup = find_category_items(&data, category_name);
        if let Some(matched) = &lookup.matched {
            info!(category = %matched, "Found matching category");
        }

        if lookup.items.is_empty() {
            warn!(
                category = %category_name,
                available = %lookup.observed.join(", "),
                "No items found for category"
            );
            return Err(ServiceError::CategoryNotFound {
                category_name: category_name.to_string(),
                available: lookup.observed,
            });
        }

        info!(
            count = lookup.items.len(),
            category = %category_name,
            "Found items in category"
        );
        Ok(lookup.items)
    }
}
