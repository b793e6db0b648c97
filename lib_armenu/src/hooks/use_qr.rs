use tokio::sync::watch;

use super::fetch_state::FetchState;
use super::resource::Resource;
use crate::menu::models::ItemId;
use crate::menu::qr_api::{QrApi, QrCode, QrOptions};

/// QR code hook for one item.
pub struct UseQr {
    api: QrApi,
    resource: Resource<(ItemId, QrOptions), QrCode>,
}

impl UseQr {
    pub fn new(api: QrApi, item_id: ItemId, options: QrOptions) -> Self {
        Self {
            api,
            resource: Resource::new((item_id, options)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<QrCode>> {
        self.resource.subscribe()
    }

    pub fn state(&self) -> FetchState<QrCode> {
        self.resource.state()
    }

    pub async fn fetch(&self) -> FetchState<QrCode> {
        let api = &self.api;
        self.resource
            .load(|(item_id, options)| async move { api.fetch_png(item_id, options).await })
            .await
    }

    pub async fn refetch(&self) -> FetchState<QrCode> {
        self.fetch().await
    }

    pub async fn set_target(&self, item_id: ItemId, options: QrOptions) -> FetchState<QrCode> {
        if self.resource.replace_deps((item_id, options)) {
            self.fetch().await
        } else {
            self.state()
        }
    }
}
