use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File read when no `--config-path` is given.
pub const DEFAULT_CONFIG_FILE: &str = "server_menu_mock.conf";

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[clap(about = "In-memory AR menu backend for local development", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[clap(long, env = "MENU_MOCK_HOST", help = "Address to bind.")]
    pub host: Option<String>,

    #[clap(long, env = "MENU_MOCK_PORT", help = "Port to listen on.")]
    pub port: Option<u16>,

    #[clap(long, env = "MENU_MOCK_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "MENU_MOCK_CATALOG", help = "JSON file with the item list to serve instead of the built-in catalog.")]
    pub catalog_path: Option<PathBuf>,

    #[clap(long, env = "ARMENU_ADMIN_KEY", help = "Key expected in the X-Admin-Key header of admin calls.")]
    pub admin_key: Option<String>,

    #[clap(long, env = "MENU_MOCK_LOG_DIR", help = "Directory for log files. Console only when unset.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "MENU_MOCK_LOG_LEVEL", help = "Logging level (trace, debug, info, warn, error).")]
    pub log_level: Option<String>,
}

impl Config {
    // 'other' wins wherever it has a value
    fn merge(self, other: Config) -> Config {
        Config {
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            config_path: other.config_path.or(self.config_path),
            catalog_path: other.catalog_path.or(self.catalog_path),
            admin_key: other.admin_key.or(self.admin_key),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
        }
    }

    pub fn defaults() -> Config {
        Config {
            host: Some("127.0.0.1".to_string()),
            port: Some(5000),
            admin_key: Some("dev-admin-key".to_string()),
            log_level: Some("info".to_string()),
            ..Default::default()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!(
            "{}:{}",
            self.host.as_deref().unwrap_or("127.0.0.1"),
            self.port.unwrap_or(5000)
        )
    }
}

/// Defaults, then the JSON config file, then CLI arguments and environment.
pub fn load_config() -> Result<Config> {
    resolve(Config::parse())
}

/// Layers `cli` over the config file it points at (or the default file) and
/// the built-in defaults.
pub fn resolve(cli: Config) -> Result<Config> {
    let config_file_path = cli
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut current = Config::defaults();
    if config_file_path.exists() {
        current = current.merge(read_config_file(&config_file_path)?);
    }

    let mut merged = current.merge(cli);
    merged.admin_key = merged.admin_key.filter(|k| !k.trim().is_empty());
    Ok(merged)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse config file {}", path.display()))
}
