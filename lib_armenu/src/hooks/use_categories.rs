use tokio::sync::watch;

use super::fetch_state::FetchState;
use super::resource::Resource;
use crate::menu::items_api::ItemsApi;
use crate::menu::models::Category;

/// Category list derived from the current items.
pub struct UseCategories {
    api: ItemsApi,
    resource: Resource<(), Vec<Category>>,
}

impl UseCategories {
    pub fn new(api: ItemsApi) -> Self {
        Self {
            api,
            resource: Resource::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Vec<Category>>> {
        self.resource.subscribe()
    }

    pub fn state(&self) -> FetchState<Vec<Category>> {
        self.resource.state()
    }

    pub async fn fetch(&self) -> FetchState<Vec<Category>> {
        let api = &self.api;
        self.resource.load(|_| async move { api.get_categories().await }).await
    }
}
