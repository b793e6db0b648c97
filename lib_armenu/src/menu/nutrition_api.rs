use super::models::{ItemId, NutritionFacts};
use crate::retrieve::errors::MenuResult;
use crate::retrieve::ky_http::ApiClient;

/// Client for `GET /menu/{id}/nutrition`.
#[derive(Debug, Clone)]
pub struct NutritionApi {
    client: ApiClient,
}

impl NutritionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Nutrition facts for the item, or `None` when the backend has none (404).
    pub async fn get(&self, item_id: ItemId) -> MenuResult<Option<NutritionFacts>> {
        match self
            .client
            .get_json::<NutritionFacts>(&format!("menu/{}/nutrition", item_id), None)
            .await
        {
            Ok(facts) => Ok(Some(facts)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
