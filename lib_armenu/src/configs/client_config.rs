//! # Client Configuration
//!
//! `ClientConfig` describes how to reach the menu backend and how hard to try.
//! Values are layered: built-in defaults, then an optional JSON file, then
//! `ARMENU_*` environment variables. Each layer is expressed as a
//! `ClientConfigOverrides` where `Some` wins over whatever is underneath.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "armenu.json";

const ENV_API_BASE_URL: &str = "ARMENU_API_BASE_URL";
const ENV_APP_BASE_URL: &str = "ARMENU_APP_BASE_URL";
const ENV_REQUEST_TIMEOUT_MS: &str = "ARMENU_REQUEST_TIMEOUT_MS";
const ENV_TRANSPORT_RETRIES: &str = "ARMENU_TRANSPORT_RETRIES";
const ENV_ITEM_MAX_RETRIES: &str = "ARMENU_ITEM_MAX_RETRIES";
const ENV_ADMIN_KEY: &str = "ARMENU_ADMIN_KEY";

/// Errors raised while assembling a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Environment variable {name} has an invalid value: {value}")]
    InvalidEnvVar { name: String, value: String },
}

/// Retry policy for the item detail fetch.
///
/// Delay before retry `n` (0-based) is `base_delay_ms * 2^n`, capped at
/// `max_delay_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ItemRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
        }
    }
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Absolute base URL of the backend API.
    pub api_base_url: String,
    /// Origin of the AR viewing pages; QR codes deep-link into it.
    pub app_base_url: String,
    pub request_timeout_ms: u64,
    /// Transient-failure retries performed by the HTTP middleware.
    pub transport_retries: u32,
    pub item_retry: ItemRetryConfig,
    /// Sent as `X-Admin-Key` on admin endpoints.
    pub admin_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/".to_string(),
            app_base_url: "http://localhost:5173/".to_string(),
            request_timeout_ms: 10_000,
            transport_retries: 2,
            item_retry: ItemRetryConfig::default(),
            admin_key: None,
        }
    }
}

/// A partial configuration layer. `Some` values override the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigOverrides {
    pub api_base_url: Option<String>,
    pub app_base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub transport_retries: Option<u32>,
    pub item_max_retries: Option<u32>,
    pub item_base_delay_ms: Option<u64>,
    pub item_max_delay_ms: Option<u64>,
    pub admin_key: Option<String>,
}

impl ClientConfigOverrides {
    /// Merges two layers; `other` wins wherever it is `Some`.
    pub fn merge(self, other: ClientConfigOverrides) -> ClientConfigOverrides {
        ClientConfigOverrides {
            api_base_url: other.api_base_url.or(self.api_base_url),
            app_base_url: other.app_base_url.or(self.app_base_url),
            request_timeout_ms: other.request_timeout_ms.or(self.request_timeout_ms),
            transport_retries: other.transport_retries.or(self.transport_retries),
            item_max_retries: other.item_max_retries.or(self.item_max_retries),
            item_base_delay_ms: other.item_base_delay_ms.or(self.item_base_delay_ms),
            item_max_delay_ms: other.item_max_delay_ms.or(self.item_max_delay_ms),
            admin_key: other.admin_key.or(self.admin_key),
        }
    }

    /// Reads a layer from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds a layer from `ARMENU_*` variables yielded by `lookup`.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_base_url: lookup(ENV_API_BASE_URL),
            app_base_url: lookup(ENV_APP_BASE_URL),
            request_timeout_ms: parse_env(&lookup, ENV_REQUEST_TIMEOUT_MS)?,
            transport_retries: parse_env(&lookup, ENV_TRANSPORT_RETRIES)?,
            item_max_retries: parse_env(&lookup, ENV_ITEM_MAX_RETRIES)?,
            item_base_delay_ms: None,
            item_max_delay_ms: None,
            admin_key: lookup(ENV_ADMIN_KEY).filter(|k| !k.trim().is_empty()),
        })
    }

    /// Builds a layer from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| env::var(name).ok())
    }
}

fn parse_env<F, T>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
    }
}

impl ClientConfig {
    /// Applies a layer on top of this configuration.
    pub fn apply(mut self, layer: ClientConfigOverrides) -> Self {
        if let Some(v) = layer.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = layer.app_base_url {
            self.app_base_url = v;
        }
        if let Some(v) = layer.request_timeout_ms {
            self.request_timeout_ms = v;
        }
        if let Some(v) = layer.transport_retries {
            self.transport_retries = v;
        }
        if let Some(v) = layer.item_max_retries {
            self.item_retry.max_retries = v;
        }
        if let Some(v) = layer.item_base_delay_ms {
            self.item_retry.base_delay_ms = v;
        }
        if let Some(v) = layer.item_max_delay_ms {
            self.item_retry.max_delay_ms = v;
        }
        if layer.admin_key.is_some() {
            self.admin_key = layer.admin_key;
        }
        self
    }

    /// Defaults, then `path` (or `armenu.json` if present), then environment.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_layer = match path {
            Some(p) => ClientConfigOverrides::from_json_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    ClientConfigOverrides::from_json_file(default_path)?
                } else {
                    ClientConfigOverrides::default()
                }
            }
        };
        let env_layer = ClientConfigOverrides::from_env()?;
        Ok(Self::default().apply(file_layer.merge(env_layer)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(map: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |name| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn defaults_match_documented_retry_policy() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.item_retry.max_retries, 3);
        assert_eq!(cfg.item_retry.base_delay_ms, 1000);
        assert_eq!(cfg.item_retry.max_delay_ms, 10_000);
        assert!(cfg.admin_key.is_none());
    }

    #[test]
    fn later_layer_wins_when_set() {
        let file = ClientConfigOverrides {
            api_base_url: Some("http://file/".into()),
            request_timeout_ms: Some(500),
            ..Default::default()
        };
        let env = ClientConfigOverrides {
            api_base_url: Some("http://env/".into()),
            ..Default::default()
        };
        let cfg = ClientConfig::default().apply(file.merge(env));
        assert_eq!(cfg.api_base_url, "http://env/");
        assert_eq!(cfg.request_timeout_ms, 500);
    }

    #[test]
    fn env_layer_parses_numbers_and_rejects_garbage() {
        let ok = ClientConfigOverrides::from_env_with(lookup_from(HashMap::from([
            (ENV_TRANSPORT_RETRIES, "0"),
            (ENV_ITEM_MAX_RETRIES, " 5 "),
            (ENV_ADMIN_KEY, "secret"),
        ])))
        .unwrap();
        assert_eq!(ok.transport_retries, Some(0));
        assert_eq!(ok.item_max_retries, Some(5));
        assert_eq!(ok.admin_key.as_deref(), Some("secret"));

        let err = ClientConfigOverrides::from_env_with(lookup_from(HashMap::from([(
            ENV_REQUEST_TIMEOUT_MS,
            "soon",
        )])))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }

    #[test]
    fn blank_admin_key_is_ignored() {
        let layer = ClientConfigOverrides::from_env_with(lookup_from(HashMap::from([(ENV_ADMIN_KEY, "  ")]))).unwrap();
        assert!(layer.admin_key.is_none());
    }

    #[test]
    fn json_file_layer_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"app_base_url":"https://menu.example/","item_max_delay_ms":2000}}"#).unwrap();

        let layer = ClientConfigOverrides::from_json_file(file.path()).unwrap();
        let cfg = ClientConfig::default().apply(layer);
        assert_eq!(cfg.app_base_url, "https://menu.example/");
        assert_eq!(cfg.item_retry.max_delay_ms, 2000);
        assert_eq!(cfg.item_retry.base_delay_ms, 1000);
    }

    #[test]
    fn malformed_json_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = ClientConfigOverrides::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }
}
