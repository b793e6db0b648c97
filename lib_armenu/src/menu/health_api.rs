use super::models::HealthStatus;
use crate::retrieve::errors::MenuResult;
use crate::retrieve::ky_http::ApiClient;

/// Client for `GET /healthz`.
#[derive(Debug, Clone)]
pub struct HealthApi {
    client: ApiClient,
}

impl HealthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn check(&self) -> MenuResult<HealthStatus> {
        self.client.get_json("healthz", None).await
    }
}
