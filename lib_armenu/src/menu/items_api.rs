//! # Items API
//!
//! Wraps `GET /items`, the only listing endpoint the backend offers, and
//! layers the in-memory category filter, search, pagination and category
//! derivation on top of it. Every fetched list is validated before use.

use tracing::debug;

use super::filtering::{derive_categories, filter_items, paginate, ItemFilters};
use super::models::{Category, Item, ItemDetail, ItemId, PaginatedItems};
use super::validation::validate_all;
use crate::retrieve::errors::{ApiError, MenuResult};
use crate::retrieve::ky_http::ApiClient;

const ITEMS_PATH: &str = "items";

/// Client for the menu items resource.
#[derive(Debug, Clone)]
pub struct ItemsApi {
    client: ApiClient,
}

impl ItemsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches and validates the full item list.
    async fn fetch_all(&self) -> MenuResult<Vec<Item>> {
        let items: Vec<Item> = self.client.get_json(ITEMS_PATH, None).await?;
        validate_all(&items)?;
        debug!(count = items.len(), "items fetched");
        Ok(items)
    }

    /// All items, narrowed by the optional category and search filters.
    pub async fn get_all(&self, filters: &ItemFilters) -> MenuResult<Vec<Item>> {
        let items = self.fetch_all().await?;
        if filters.is_empty() {
            return Ok(items);
        }
        let filtered = filter_items(items, filters);
        debug!(count = filtered.len(), category = ?filters.category, search = ?filters.search, "items filtered");
        Ok(filtered)
    }

    /// The item with `id`, or `NOT_FOUND`.
    pub async fn get_by_id(&self, id: ItemId) -> MenuResult<ItemDetail> {
        let items = self.fetch_all().await?;
        items
            .into_iter()
            .find(|item| item.id == id)
            .map(ItemDetail::from)
            .ok_or_else(|| ApiError::not_found(format!("Item {} not found", id)).into())
    }

    /// Case-insensitive substring search over name, description and category.
    ///
    /// # Errors
    /// `INVALID_INPUT` for an empty query.
    pub async fn search(&self, query: &str) -> MenuResult<Vec<Item>> {
        if query.trim().is_empty() {
            return Err(ApiError::invalid_input("Search query must not be empty").into());
        }
        self.get_all(&ItemFilters::search(query)).await
    }

    /// # Errors
    /// `INVALID_INPUT` for an empty category.
    pub async fn get_by_category(&self, category: &str) -> MenuResult<Vec<Item>> {
        if category.trim().is_empty() {
            return Err(ApiError::invalid_input("Category must not be empty").into());
        }
        self.get_all(&ItemFilters::category(category)).await
    }

    /// Items that advertise an AR model.
    pub async fn get_ar_items(&self) -> MenuResult<Vec<Item>> {
        let items = self.fetch_all().await?;
        Ok(items.into_iter().filter(|item| item.has_ar_model).collect())
    }

    pub async fn get_paginated(&self, page: i64, limit: i64) -> MenuResult<PaginatedItems> {
        self.get_paginated_filtered(&ItemFilters::default(), page, limit).await
    }

    /// Filters first, then paginates the filtered list.
    pub async fn get_paginated_filtered(&self, filters: &ItemFilters, page: i64, limit: i64) -> MenuResult<PaginatedItems> {
        let items = self.get_all(filters).await?;
        Ok(paginate(items, page, limit))
    }

    /// Categories derived from the current item list.
    pub async fn get_categories(&self) -> MenuResult<Vec<Category>> {
        let items = self.fetch_all().await?;
        Ok(derive_categories(&items))
    }
}
