use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use lib_armenu::menu::models::{Item, ItemId, NewItem, NutritionFacts};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::catalog;

/// One `POST /analytics/ar-view` report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArView {
    pub item_id: ItemId,
    pub platform: String,
    #[serde(default)]
    pub viewed_at: Option<String>,
}

#[derive(Clone)]
pub struct MockState {
    // Catalog served by /items and the admin routes
    items: Arc<Mutex<Vec<Item>>>,
    nutrition: Arc<Mutex<HashMap<ItemId, NutritionFacts>>>,
    ar_views: Arc<Mutex<Vec<ArView>>>,
    admin_key: Option<Arc<str>>,
    // Number of GET /items requests seen so far
    item_requests: Arc<AtomicUsize>,
    // Pending injected failures for GET /items
    failing_item_requests: Arc<AtomicUsize>,
    // Artificial latency of POST /analytics/ar-view, in milliseconds
    ar_view_delay_ms: Arc<AtomicU64>,
}

impl MockState {
    pub fn new(items: Vec<Item>, nutrition: HashMap<ItemId, NutritionFacts>, admin_key: Option<String>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
            nutrition: Arc::new(Mutex::new(nutrition)),
            ar_views: Arc::new(Mutex::new(Vec::new())),
            admin_key: admin_key.map(Arc::from),
            item_requests: Arc::new(AtomicUsize::new(0)),
            failing_item_requests: Arc::new(AtomicUsize::new(0)),
            ar_view_delay_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// State over the built-in demo catalog.
    pub fn demo(admin_key: Option<String>) -> Self {
        Self::new(catalog::demo_items(), catalog::demo_nutrition(), admin_key)
    }

    pub async fn items(&self) -> Vec<Item> {
        self.items.lock().await.clone()
    }

    pub async fn replace_items(&self, items: Vec<Item>) {
        *self.items.lock().await = items;
    }

    /// Stores `new_item` under the next free id.
    pub async fn add_item(&self, new_item: NewItem) -> Item {
        let mut items = self.items.lock().await;
        let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let item = Item {
            id,
            name: new_item.name,
            description: new_item.description,
            category: new_item.category,
            price: new_item.price,
            has_ar_model: new_item.has_ar_model,
            model_url_glb: new_item.model_url_glb,
            model_url_usdz: new_item.model_url_usdz,
            image_url: new_item.image_url,
            dietary: new_item.dietary,
            rating: None,
            rating_count: None,
        };
        items.push(item.clone());
        item
    }

    /// Returns false when no item had `id`.
    pub async fn delete_item(&self, id: ItemId) -> bool {
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|i| i.id != id);
        let removed = items.len() != before;
        if removed {
            self.nutrition.lock().await.remove(&id);
        }
        removed
    }

    pub async fn has_item(&self, id: ItemId) -> bool {
        self.items.lock().await.iter().any(|i| i.id == id)
    }

    pub async fn nutrition(&self, id: ItemId) -> Option<NutritionFacts> {
        self.nutrition.lock().await.get(&id).cloned()
    }

    pub async fn record_view(&self, view: ArView) {
        self.ar_views.lock().await.push(view);
    }

    pub async fn ar_views(&self) -> Vec<ArView> {
        self.ar_views.lock().await.clone()
    }

    /// Slows every later `POST /analytics/ar-view` down by `delay`.
    pub fn delay_ar_views(&self, delay: Duration) {
        self.ar_view_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn ar_view_delay(&self) -> Duration {
        Duration::from_millis(self.ar_view_delay_ms.load(Ordering::SeqCst))
    }

    pub fn admin_key_matches(&self, presented: Option<&str>) -> bool {
        match (&self.admin_key, presented) {
            (Some(expected), Some(given)) => expected.as_ref() == given.trim(),
            _ => false,
        }
    }

    pub fn item_requests(&self) -> usize {
        self.item_requests.load(Ordering::SeqCst)
    }

    /// Makes the next `count` `GET /items` calls answer 503.
    pub fn fail_next_item_requests(&self, count: usize) {
        self.failing_item_requests.store(count, Ordering::SeqCst);
    }

    /// Counts a `GET /items` call; true when it should fail.
    pub(crate) fn begin_item_request(&self) -> bool {
        self.item_requests.fetch_add(1, Ordering::SeqCst);
        self.failing_item_requests
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}
