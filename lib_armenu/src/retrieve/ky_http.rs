//! # HTTP Retrieval Utilities
//!
//! An asynchronous API client wrapper around `reqwest`. Every request gets an
//! `X-Request-ID`, is logged with its outcome, passes through the transient
//! retry middleware and comes back either as a decoded payload or as a typed
//! `MenuError`.

use std::time::Instant;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::envelope::{decode_error_body, decode_payload};
use super::errors::{ApiError, ErrorCode, MenuError, MenuResult};
use crate::configs::client_config::ClientConfig;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Header carrying the admin key on admin endpoints.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// A decoded successful response with its transport metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub headers: HeaderMap,
    pub request_id: String,
}

/// A flexible asynchronous HTTP client.
///
/// Built on top of `reqwest_middleware`, it handles the base URL, request
/// ids, transient retries and error normalisation. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: ClientWithMiddleware,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for `config.api_base_url`.
    ///
    /// # Errors
    /// `INVALID_INPUT` if the base URL is not absolute, `NETWORK_ERROR` if the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> MenuResult<Self> {
        let base_url = parse_base_url(&config.api_base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::new(ErrorCode::NetworkError, format!("Failed to build HTTP client: {}", e)))?;

        let mut builder = ClientBuilder::new(http);
        if config.transport_retries > 0 {
            let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.transport_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            inner: builder.build(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins a relative path onto the base URL.
    pub fn url_for(&self, path: &str) -> MenuResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::invalid_input(format!("Invalid request path '{}': {}", path, e)).into())
    }

    /// Performs a request and decodes the JSON payload into `T`.
    ///
    /// The standard `{ success, data, message }` envelope is unwrapped when
    /// present.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        headers: Option<HeaderMap>,
        body: Option<&B>,
    ) -> MenuResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (status, resp_headers, request_id, raw) = self.execute(method, path, headers, body, "application/json").await?;

        let value: Value = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&raw).map_err(|e| {
                warn!(request_id = %request_id, path, error = %e, "response body is not JSON");
                MenuError::from(
                    ApiError::new(ErrorCode::ParseError, format!("Response body is not valid JSON: {}", e)).with_status(status),
                )
            })?
        };

        let data = decode_payload::<T>(value).map_err(|e| {
            warn!(request_id = %request_id, path, error = %e, "response payload rejected");
            e
        })?;

        Ok(ApiResponse {
            data,
            status,
            headers: resp_headers,
            request_id,
        })
    }

    /// `GET` returning only the decoded payload.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, headers: Option<HeaderMap>) -> MenuResult<T> {
        self.request::<T, ()>(Method::GET, path, headers, None)
            .await
            .map(|r| r.data)
    }

    /// `GET` returning the raw body bytes (images).
    pub async fn get_bytes(&self, path: &str, headers: Option<HeaderMap>) -> MenuResult<(Bytes, HeaderMap)> {
        let (_, resp_headers, _, raw) = self
            .execute::<()>(Method::GET, path, headers, None, "*/*")
            .await?;
        Ok((raw, resp_headers))
    }

    /// Sends a request whose response body is irrelevant; returns the status.
    pub async fn send<B>(&self, method: Method, path: &str, headers: Option<HeaderMap>, body: Option<&B>) -> MenuResult<u16>
    where
        B: Serialize + ?Sized,
    {
        let (status, _, _, _) = self.execute(method, path, headers, body, "application/json").await?;
        Ok(status)
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        headers: Option<HeaderMap>,
        body: Option<&B>,
        accept: &'static str,
    ) -> MenuResult<(u16, HeaderMap, String, Bytes)>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path)?;
        let request_id = Uuid::new_v4().to_string();
        let mut req = self.inner.request(method.clone(), url.clone());

        if let Some(h) = headers {
            req = req.headers(h);
        }
        req = req.header(ACCEPT, accept);
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            req = req.header(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        if let Some(b) = body {
            let json_body = serde_json::to_vec(b)
                .map_err(|e| ApiError::invalid_input(format!("Request body could not be serialised: {}", e)))?;
            req = req.header(CONTENT_TYPE, "application/json").body(json_body);
        }

        debug!(request_id = %request_id, method = %method, url = %url, "sending request");
        let started = Instant::now();

        let response = req.send().await.map_err(|e| {
            let err = map_transport_error(&e);
            warn!(
                request_id = %request_id,
                method = %method,
                url = %url,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "request failed before a response arrived"
            );
            err
        })?;

        let status = response.status();
        let resp_headers = response.headers().clone();
        let raw = response.bytes().await.map_err(|e| {
            MenuError::from(ApiError::new(ErrorCode::NetworkError, format!("Failed to read response body: {}", e)).with_status(status.as_u16()))
        })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if status.is_success() {
            info!(request_id = %request_id, method = %method, path, status = status.as_u16(), elapsed_ms, "request completed");
            return Ok((status.as_u16(), resp_headers, request_id, raw));
        }

        let body_text = String::from_utf8_lossy(&raw);
        let err = decode_error_body(status.as_u16(), &body_text);
        if status == StatusCode::NOT_FOUND {
            info!(request_id = %request_id, method = %method, path, status = status.as_u16(), elapsed_ms, "resource not found");
        } else {
            warn!(request_id = %request_id, method = %method, path, status = status.as_u16(), elapsed_ms, error = %err, "request rejected");
        }
        Err(err)
    }
}

/// Builds a header map carrying the admin key.
pub fn admin_headers(admin_key: &str) -> MenuResult<HeaderMap> {
    let value = HeaderValue::from_str(admin_key)
        .map_err(|_| ApiError::invalid_input("Admin key contains characters not allowed in a header"))?;
    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(ADMIN_KEY_HEADER), value);
    Ok(headers)
}

fn parse_base_url(raw: &str) -> MenuResult<Url> {
    let mut normalised = raw.trim().to_string();
    if !normalised.ends_with('/') {
        normalised.push('/');
    }
    let url = Url::parse(&normalised)
        .map_err(|e| ApiError::invalid_input(format!("Invalid base URL '{}' (must be absolute): {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::invalid_input(format!("Base URL '{}' cannot be used as a base", raw)).into());
    }
    Ok(url)
}

fn map_transport_error(e: &reqwest_middleware::Error) -> MenuError {
    let code = match e {
        reqwest_middleware::Error::Reqwest(inner) if inner.is_timeout() => ErrorCode::Timeout,
        reqwest_middleware::Error::Reqwest(inner) if inner.is_decode() => ErrorCode::ParseError,
        _ => ErrorCode::NetworkError,
    };
    ApiError::new(code, format!("Network request failed: {}", e)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> MenuResult<ApiClient> {
        let config = ClientConfig {
            api_base_url: base.to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config)
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_its_path() {
        let c = client("https://menu.example/api").unwrap();
        assert_eq!(c.url_for("items").unwrap().as_str(), "https://menu.example/api/items");
        assert_eq!(c.url_for("/qr/7").unwrap().as_str(), "https://menu.example/api/qr/7");
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let err = client("menu/api").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn admin_headers_reject_control_characters() {
        assert!(admin_headers("good-key").is_ok());
        let err = admin_headers("bad\nkey").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }
}
