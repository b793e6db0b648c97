//! # Menu Data Model
//!
//! Plain records as served by the backend. `price` stays a string because
//! currency formatting is decided server side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type ItemId = i64;

// Backends often send "" for a missing URL
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// A menu/catalog entry with optional AR model references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: String,
    #[serde(default)]
    pub has_ar_model: bool,
    /// GLB asset for Android and the web viewer.
    #[serde(default, alias = "glb_url", deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub model_url_glb: Option<String>,
    /// USDZ asset for iOS Quick Look.
    #[serde(default, alias = "usdz_url", deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub model_url_usdz: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
}

impl Item {
    /// True when the item advertises AR and references at least one model.
    pub fn ar_ready(&self) -> bool {
        self.has_ar_model && (self.model_url_glb.is_some() || self.model_url_usdz.is_some())
    }
}

/// Nutrition facts for one item. Every figure is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionFacts {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub allergens: Vec<String>,
}

/// An item plus the extra detail-page metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionFacts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl From<Item> for ItemDetail {
    fn from(item: Item) -> Self {
        Self {
            item,
            created_at: None,
            updated_at: None,
            tags: Vec::new(),
            nutrition: None,
            available: None,
        }
    }
}

/// A derived category with the number of items in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedItems {
    pub items: Vec<Item>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.trim().to_lowercase().as_str(), "ok" | "healthy")
    }
}

/// Payload of `POST /admin/items/add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: String,
    #[serde(default)]
    pub has_ar_model: bool,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub model_url_glb: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub model_url_usdz: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary: Vec<String>,
}
