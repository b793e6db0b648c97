//! Item list hook: filtered, optionally paginated.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::fetch_state::FetchState;
use super::resource::Resource;
use crate::menu::filtering::{ItemFilters, DEFAULT_LIMIT};
use crate::menu::items_api::ItemsApi;
use crate::menu::models::{Item, Pagination};
use crate::retrieve::errors::MenuResult;

/// Dependencies of `UseItems`. Setting `page` or `limit` switches to
/// paginated results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ItemsQuery {
    pub fn filters(&self) -> ItemFilters {
        ItemFilters {
            category: self.category.clone(),
            search: self.search.clone(),
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemsPage {
    pub items: Vec<Item>,
    pub pagination: Option<Pagination>,
}

pub struct UseItems {
    api: ItemsApi,
    resource: Resource<ItemsQuery, ItemsPage>,
}

impl UseItems {
    pub fn new(api: ItemsApi, query: ItemsQuery) -> Self {
        Self {
            api,
            resource: Resource::new(query),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<ItemsPage>> {
        self.resource.subscribe()
    }

    pub fn state(&self) -> FetchState<ItemsPage> {
        self.resource.state()
    }

    pub fn query(&self) -> ItemsQuery {
        self.resource.deps()
    }

    /// Loads with the current query.
    pub async fn fetch(&self) -> FetchState<ItemsPage> {
        let api = &self.api;
        self.resource.load(|query| load_items(api, query)).await
    }

    pub async fn refetch(&self) -> FetchState<ItemsPage> {
        self.fetch().await
    }

    /// Re-fetches only when `query` differs from the current one.
    pub async fn set_query(&self, query: ItemsQuery) -> FetchState<ItemsPage> {
        if self.resource.replace_deps(query) {
            self.fetch().await
        } else {
            self.state()
        }
    }
}

async fn load_items(api: &ItemsApi, query: ItemsQuery) -> MenuResult<ItemsPage> {
    let filters = query.filters();
    if !query.is_paginated() {
        return Ok(ItemsPage {
            items: api.get_all(&filters).await?,
            pagination: None,
        });
    }

    let page = api
        .get_paginated_filtered(&filters, query.page.unwrap_or(1), query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(ItemsPage {
        items: page.items,
        pagination: Some(page.pagination),
    })
}
