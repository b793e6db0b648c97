//! AR session hook.
//!
//! Loads the item, picks the model for the platform and builds the viewer
//! URL. A successful session also reports an AR view on a background task;
//! that report never delays or affects the session state.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::fetch_state::FetchState;
use super::resource::Resource;
use crate::menu::ar_api::{ArApi, ArModel, Platform};
use crate::menu::items_api::ItemsApi;
use crate::menu::models::{Item, ItemId};
use crate::retrieve::errors::MenuResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArSession {
    pub item: Item,
    pub platform: Platform,
    pub model: ArModel,
    pub launch_url: String,
    pub started_at: DateTime<Utc>,
}

pub struct UseArSession {
    items: ItemsApi,
    ar: ArApi,
    resource: Resource<(ItemId, Platform), ArSession>,
    // View reports still in flight
    pending_views: Mutex<Vec<JoinHandle<()>>>,
}

impl UseArSession {
    pub fn new(items: ItemsApi, ar: ArApi, item_id: ItemId, platform: Platform) -> Self {
        Self {
            items,
            ar,
            resource: Resource::new((item_id, platform)),
            pending_views: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<ArSession>> {
        self.resource.subscribe()
    }

    pub fn state(&self) -> FetchState<ArSession> {
        self.resource.state()
    }

    pub async fn start(&self) -> FetchState<ArSession> {
        let items = &self.items;
        let ar = &self.ar;
        let pending = &self.pending_views;
        self.resource
            .load(|(item_id, platform)| open_session(items, ar, pending, item_id, platform))
            .await
    }

    /// Waits for view reports started by earlier sessions.
    ///
    /// Short-lived callers use this before the runtime shuts down.
    pub async fn flush_tracking(&self) {
        let handles = match self.pending_views.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for handle in handles {
            if let Err(e) = handle.await {
                debug!(error = %e, "AR view report task ended abnormally");
            }
        }
    }

    pub async fn restart(&self) -> FetchState<ArSession> {
        self.start().await
    }

    /// Starts a new session when the item or platform changes.
    pub async fn set_target(&self, item_id: ItemId, platform: Platform) -> FetchState<ArSession> {
        if self.resource.replace_deps((item_id, platform)) {
            self.start().await
        } else {
            self.state()
        }
    }
}

async fn open_session(
    items: &ItemsApi,
    ar: &ArApi,
    pending: &Mutex<Vec<JoinHandle<()>>>,
    item_id: ItemId,
    platform: Platform,
) -> MenuResult<ArSession> {
    let item = items.get_by_id(item_id).await?.item;
    let model = ar.resolve_model(&item, platform)?;
    let launch_url = ar.launch_url(&item, &model, platform)?;

    info!(item_id, %platform, model = %model.url, "AR session ready");
    let tracker = ar.clone();
    let handle = tokio::spawn(async move { tracker.track_view(item_id, platform).await });
    match pending.lock() {
        Ok(mut guard) => guard.push(handle),
        Err(poisoned) => poisoned.into_inner().push(handle),
    }

    Ok(ArSession {
        item,
        platform,
        model,
        launch_url,
        started_at: Utc::now(),
    })
}
