//! Item detail hook with retry-on-error.

use tokio::sync::watch;
use tracing::debug;

use super::fetch_state::FetchState;
use super::resource::Resource;
use super::retry::retry_with_backoff;
use crate::configs::client_config::ItemRetryConfig;
use crate::menu::items_api::ItemsApi;
use crate::menu::models::{ItemDetail, ItemId};

pub struct UseItem {
    api: ItemsApi,
    retry: ItemRetryConfig,
    resource: Resource<ItemId, ItemDetail>,
}

impl UseItem {
    pub fn new(api: ItemsApi, id: ItemId, retry: ItemRetryConfig) -> Self {
        Self {
            api,
            retry,
            resource: Resource::new(id),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<ItemDetail>> {
        self.resource.subscribe()
    }

    pub fn state(&self) -> FetchState<ItemDetail> {
        self.resource.state()
    }

    pub fn id(&self) -> ItemId {
        self.resource.deps()
    }

    /// Loads the item, retrying transient failures with exponential backoff.
    pub async fn fetch(&self) -> FetchState<ItemDetail> {
        let api = &self.api;
        let retry = &self.retry;
        self.resource
            .load(|id| async move {
                retry_with_backoff(retry, |attempt| {
                    debug!(item_id = id, attempt, "fetching item detail");
                    api.get_by_id(id)
                })
                .await
            })
            .await
    }

    pub async fn refetch(&self) -> FetchState<ItemDetail> {
        self.fetch().await
    }

    /// Switches to another item; same id keeps the current state.
    pub async fn set_id(&self, id: ItemId) -> FetchState<ItemDetail> {
        if self.resource.replace_deps(id) {
            self.fetch().await
        } else {
            self.state()
        }
    }
}
