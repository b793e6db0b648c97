//! # Admin API
//!
//! Catalog management endpoints. Every call carries `X-Admin-Key`; without a
//! configured key the call fails with `UNAUTHORIZED` and nothing is sent.

use reqwest::header::HeaderMap;
use reqwest::Method;
use tracing::info;

use super::models::{Item, ItemId, NewItem};
use super::validation::{validate_all, Validate};
use crate::retrieve::errors::{ApiError, ErrorCode, MenuResult};
use crate::retrieve::ky_http::{admin_headers, ApiClient};

#[derive(Debug, Clone)]
pub struct AdminApi {
    client: ApiClient,
    admin_key: Option<String>,
}

impl AdminApi {
    pub fn new(client: ApiClient, admin_key: Option<String>) -> Self {
        Self { client, admin_key }
    }

    fn headers(&self) -> MenuResult<HeaderMap> {
        match self.admin_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => admin_headers(key),
            None => Err(ApiError::new(ErrorCode::Unauthorized, "No admin key configured").into()),
        }
    }

    /// Checks the key with the backend. A rejected key is `Ok(false)`.
    pub async fn verify(&self) -> MenuResult<bool> {
        let headers = self.headers()?;
        match self.client.send::<()>(Method::POST, "admin/verify", Some(headers), None).await {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::Unauthorized => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn list_items(&self) -> MenuResult<Vec<Item>> {
        let headers = self.headers()?;
        let items: Vec<Item> = self.client.get_json("admin/items", Some(headers)).await?;
        validate_all(&items)?;
        Ok(items)
    }

    /// Validates `new_item` locally, then creates it.
    pub async fn add_item(&self, new_item: &NewItem) -> MenuResult<Item> {
        let headers = self.headers()?;
        new_item.validate()?;
        let created = self
            .client
            .request::<Item, NewItem>(Method::POST, "admin/items/add", Some(headers), Some(new_item))
            .await?
            .data;
        created.validate()?;
        info!(item_id = created.id, name = %created.name, "item added");
        Ok(created)
    }

    pub async fn delete_item(&self, id: ItemId) -> MenuResult<()> {
        let headers = self.headers()?;
        self.client
            .send::<()>(Method::DELETE, &format!("admin/items/{}", id), Some(headers), None)
            .await?;
        info!(item_id = id, "item deleted");
        Ok(())
    }
}
