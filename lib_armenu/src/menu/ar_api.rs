//! # AR API
//!
//! Picks the right 3D asset for the viewer's platform and produces the URL
//! that opens it: Scene Viewer on Android, Quick Look (USDZ) on iOS, and the
//! GLB itself for the web `model-viewer` element. Rendering is not done here.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::models::{Item, ItemId};
use crate::retrieve::errors::{ApiError, ErrorCode, MenuResult};
use crate::retrieve::ky_http::ApiClient;

const SCENE_VIEWER_URL: &str = "https://arvr.google.com/scene-viewer/1.0";
const TRACK_VIEW_PATH: &str = "analytics/ar-view";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl Platform {
    /// Best-effort detection from a browser user-agent string.
    pub fn from_user_agent(user_agent: &str) -> Platform {
        let ua = user_agent.to_lowercase();
        if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
            Platform::Ios
        } else if ua.contains("android") {
            Platform::Android
        } else {
            Platform::Web
        }
    }

    /// Asset format the platform's native viewer expects.
    pub fn preferred_format(&self) -> ModelFormat {
        match self {
            Platform::Ios => ModelFormat::Usdz,
            Platform::Android | Platform::Web => ModelFormat::Glb,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
        })
    }
}

impl FromStr for Platform {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" | "iphone" | "ipad" => Ok(Platform::Ios),
            "web" | "desktop" => Ok(Platform::Web),
            other => Err(ApiError::invalid_input(format!("Unknown platform '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Glb,
    Usdz,
}

/// A resolved, absolute model reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArModel {
    pub format: ModelFormat,
    pub url: String,
}

/// Client for AR model resolution and AR view tracking.
#[derive(Debug, Clone)]
pub struct ArApi {
    client: ApiClient,
}

impl ArApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Chooses the model for `platform`, falling back to the other format.
    ///
    /// Relative model URLs are resolved against the API base URL.
    ///
    /// # Errors
    /// `AR_NOT_AVAILABLE` when the item has no AR model at all.
    pub fn resolve_model(&self, item: &Item, platform: Platform) -> MenuResult<ArModel> {
        resolve_model_against(self.client.base_url(), item, platform)
    }

    /// URL that opens `model` in the platform viewer.
    pub fn launch_url(&self, item: &Item, model: &ArModel, platform: Platform) -> MenuResult<String> {
        launch_url_for(item, model, platform)
    }

    /// Records an AR view. Failures are logged and swallowed.
    pub async fn track_view(&self, item_id: ItemId, platform: Platform) {
        let body = json!({
            "item_id": item_id,
            "platform": platform,
            "viewed_at": Utc::now().to_rfc3339(),
        });
        match self.client.send(Method::POST, TRACK_VIEW_PATH, None, Some(&body)).await {
            Ok(status) => debug!(item_id, %platform, status, "AR view tracked"),
            Err(e) => debug!(item_id, %platform, error = %e, "AR view tracking failed; ignored"),
        }
    }
}

pub(crate) fn resolve_model_against(base: &Url, item: &Item, platform: Platform) -> MenuResult<ArModel> {
    let not_available = || ApiError::new(ErrorCode::ArNotAvailable, format!("Item {} has no AR model", item.id));
    if !item.has_ar_model {
        return Err(not_available().into());
    }

    let glb = item.model_url_glb.as_deref().map(|u| (ModelFormat::Glb, u));
    let usdz = item.model_url_usdz.as_deref().map(|u| (ModelFormat::Usdz, u));
    let chosen = match platform.preferred_format() {
        ModelFormat::Usdz => usdz.or(glb),
        ModelFormat::Glb => glb.or(usdz),
    };
    let (format, raw) = chosen.ok_or_else(not_available)?;

    let url = base
        .join(raw)
        .map_err(|e| ApiError::new(ErrorCode::ParseError, format!("Invalid model URL '{}': {}", raw, e)))?;
    Ok(ArModel {
        format,
        url: url.to_string(),
    })
}

pub(crate) fn launch_url_for(item: &Item, model: &ArModel, platform: Platform) -> MenuResult<String> {
    match (platform, model.format) {
        (Platform::Android, ModelFormat::Glb) => {
            let url = Url::parse_with_params(
                SCENE_VIEWER_URL,
                &[
                    ("file", model.url.as_str()),
                    ("mode", "ar_preferred"),
                    ("title", item.name.as_str()),
                ],
            )
            .map_err(|e| ApiError::new(ErrorCode::ParseError, format!("Failed to build Scene Viewer URL: {}", e)))?;
            Ok(url.to_string())
        }
        _ => Ok(model.url.clone()),
    }
}
