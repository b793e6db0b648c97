//! # QR API
//!
//! The backend renders QR images at `GET /qr/{itemId}`. The code encodes a
//! deep link to the item's AR viewing page, which this module can also
//! compute locally for display next to the image.

use std::fs;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::models::ItemId;
use crate::retrieve::errors::{ApiError, ErrorCode, MenuResult};
use crate::retrieve::ky_http::ApiClient;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
}

/// Requested rendering. The backend currently ignores both fields and
/// always returns its default PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QrOptions {
    pub size: u32,
    pub format: QrFormat,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: 256,
            format: QrFormat::Png,
        }
    }
}

/// A fetched QR image and the link it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    pub item_id: ItemId,
    pub target_url: String,
    pub png: Bytes,
}

impl QrCode {
    /// Writes the PNG to `path`.
    pub fn save(&self, path: &Path) -> MenuResult<()> {
        fs::write(path, &self.png).map_err(|e| {
            ApiError::new(ErrorCode::InvalidInput, format!("Failed to write QR image to {}: {}", path.display(), e)).into()
        })
    }
}

pub fn is_png(bytes: &[u8]) -> bool {
    bytes.len() > PNG_SIGNATURE.len() && bytes.starts_with(&PNG_SIGNATURE)
}

/// Deep link encoded in an item's QR code: `{app_base_url}/ar/{item_id}`.
pub fn ar_page_url(app_base_url: &str, item_id: ItemId) -> MenuResult<String> {
    let mut base = app_base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let url = Url::parse(&base)
        .and_then(|b| b.join(&format!("ar/{}", item_id)))
        .map_err(|e| ApiError::invalid_input(format!("Invalid app base URL '{}': {}", app_base_url, e)))?;
    Ok(url.to_string())
}

#[derive(Debug, Clone)]
pub struct QrApi {
    client: ApiClient,
    app_base_url: String,
}

impl QrApi {
    pub fn new(client: ApiClient, app_base_url: impl Into<String>) -> Self {
        Self {
            client,
            app_base_url: app_base_url.into(),
        }
    }

    pub fn target_url(&self, item_id: ItemId) -> MenuResult<String> {
        ar_page_url(&self.app_base_url, item_id)
    }

    /// Fetches the QR PNG for `item_id`.
    ///
    /// # Errors
    /// `PARSE_ERROR` when the body is not a PNG; `INVALID_INPUT` for
    /// non-PNG formats, which the backend cannot produce.
    pub async fn fetch_png(&self, item_id: ItemId, options: QrOptions) -> MenuResult<QrCode> {
        if options.format != QrFormat::Png {
            return Err(ApiError::invalid_input("Only PNG QR codes are available").into());
        }
        let target_url = self.target_url(item_id)?;
        debug!(item_id, size = options.size, "size is not honoured by the backend; fetching default QR image");

        let (png, _) = self.client.get_bytes(&format!("qr/{}", item_id), None).await?;
        if !is_png(&png) {
            return Err(ApiError::new(ErrorCode::ParseError, format!("QR response for item {} is not a PNG image", item_id)).into());
        }

        Ok(QrCode {
            item_id,
            target_url,
            png,
        })
    }
}
