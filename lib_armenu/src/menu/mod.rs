//! # Menu API Modules
//!
//! One module per backend resource, all sharing a single `ApiClient`.
//! `MenuApi` bundles them the way the front-end consumes them.

/// Catalog management behind `X-Admin-Key`.
pub mod admin_api;
/// AR model selection, viewer launch URLs and view tracking.
pub mod ar_api;
/// In-memory category filter, search, pagination and category derivation.
pub mod filtering;
/// Backend liveness.
pub mod health_api;
/// Item listing, lookup and the client-side fallbacks built on it.
pub mod items_api;
/// Data records.
pub mod models;
/// Nutrition facts per item.
pub mod nutrition_api;
/// QR images and AR deep links.
pub mod qr_api;
/// Checks applied to fetched and outgoing records.
pub mod validation;

use crate::configs::client_config::ClientConfig;
use crate::retrieve::errors::MenuResult;
use crate::retrieve::ky_http::ApiClient;

pub use admin_api::AdminApi;
pub use ar_api::{ArApi, ArModel, ModelFormat, Platform};
pub use filtering::ItemFilters;
pub use health_api::HealthApi;
pub use items_api::ItemsApi;
pub use models::{Category, HealthStatus, Item, ItemDetail, ItemId, NewItem, NutritionFacts, PaginatedItems, Pagination};
pub use nutrition_api::NutritionApi;
pub use qr_api::{QrApi, QrCode, QrFormat, QrOptions};

/// All resource clients over one shared HTTP client.
#[derive(Debug, Clone)]
pub struct MenuApi {
    pub items: ItemsApi,
    pub ar: ArApi,
    pub qr: QrApi,
    pub nutrition: NutritionApi,
    pub admin: AdminApi,
    pub health: HealthApi,
}

impl MenuApi {
    pub fn new(config: &ClientConfig) -> MenuResult<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self {
            items: ItemsApi::new(client.clone()),
            ar: ArApi::new(client.clone()),
            qr: QrApi::new(client.clone(), config.app_base_url.clone()),
            nutrition: NutritionApi::new(client.clone()),
            admin: AdminApi::new(client.clone(), config.admin_key.clone()),
            health: HealthApi::new(client),
        })
    }
}
