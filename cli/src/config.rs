use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lib_armenu::configs::client_config::{ClientConfig, ClientConfigOverrides};
use lib_armenu::menu::{ItemId, NewItem, Platform};
use std::path::PathBuf;

/// Command-line front-end for the AR menu.
#[derive(Parser, Debug)]
#[command(
    name = "armenu",
    version,
    about = "Browse the AR menu: item lists, details, QR codes and AR launch links.",
    long_about = "Talks to the AR menu backend. Settings come from built-in defaults, then armenu.json (or --config), then ARMENU_* environment variables (a .env file is loaded first), then flags."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// JSON client configuration file.
    #[arg(long, global = true, env = "ARMENU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the menu API.
    #[arg(long, global = true, env = "ARMENU_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Origin of the AR viewing pages encoded in QR codes.
    #[arg(long, global = true, env = "ARMENU_APP_BASE_URL")]
    pub app_base_url: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, env = "ARMENU_REQUEST_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Key sent as X-Admin-Key on admin commands.
    #[arg(long, global = true, env = "ARMENU_ADMIN_KEY", hide_env_values = true)]
    pub admin_key: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[arg(long, global = true, env = "ARMENU_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Also write logs to a file in this directory.
    #[arg(long, global = true, env = "ARMENU_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOpts {
    fn overrides(&self) -> ClientConfigOverrides {
        ClientConfigOverrides {
            api_base_url: self.api_base_url.clone(),
            app_base_url: self.app_base_url.clone(),
            request_timeout_ms: self.timeout_ms,
            admin_key: self.admin_key.clone().filter(|k| !k.trim().is_empty()),
            ..Default::default()
        }
    }

    /// Library configuration with the flags applied last.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let base = ClientConfig::load(self.config.as_deref()).context("Failed to load client configuration")?;
        Ok(base.apply(self.overrides()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the backend is reachable and healthy.
    Health,

    /// List menu items, optionally filtered and paginated.
    List(ListArgs),

    /// Show categories with their item counts.
    Categories,

    /// Show an item with its nutrition facts.
    Show {
        /// Item id.
        id: ItemId,
    },

    /// Save the QR code that links to the item's AR page.
    Qr {
        /// Item id.
        id: ItemId,

        /// Where to write the PNG.
        #[arg(short, long)]
        out: PathBuf,

        /// Requested size in pixels.
        #[arg(long, default_value_t = 256)]
        size: u32,
    },

    /// Resolve the AR model and viewer link for an item.
    Ar {
        /// Item id.
        id: ItemId,

        /// Target platform (android, ios, web).
        #[arg(long, conflicts_with = "user_agent")]
        platform: Option<Platform>,

        /// Detect the platform from a browser user-agent string.
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Catalog administration. Needs an admin key.
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only items in this category (case-insensitive).
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only items whose name, description or category contains this text.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page number, starting at 1.
    #[arg(long)]
    pub page: Option<i64>,

    /// Items per page (1 to 100).
    #[arg(long)]
    pub limit: Option<i64>,

    /// Only items with an AR model.
    #[arg(long, conflicts_with_all = ["category", "search", "page", "limit"])]
    pub ar_only: bool,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Check the admin key with the backend.
    Verify,
    /// List the catalog as the admin endpoint returns it.
    List,
    /// Add an item.
    Add(AddArgs),
    /// Delete an item.
    Delete {
        /// Item id.
        id: ItemId,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub category: String,

    /// Display price, e.g. "₺120".
    #[arg(long)]
    pub price: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// GLB model URL (Android and web).
    #[arg(long)]
    pub glb: Option<String>,

    /// USDZ model URL (iOS).
    #[arg(long)]
    pub usdz: Option<String>,

    #[arg(long)]
    pub image: Option<String>,

    /// Comma separated dietary labels.
    #[arg(long, value_delimiter = ',')]
    pub dietary: Vec<String>,
}

impl AddArgs {
    pub fn into_new_item(self) -> NewItem {
        NewItem {
            has_ar_model: self.glb.is_some() || self.usdz.is_some(),
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            model_url_glb: self.glb,
            model_url_usdz: self.usdz,
            image_url: self.image,
            dietary: self.dietary.into_iter().map(|d| d.trim().to_string()).filter(|d| !d.is_empty()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_parse() {
        let cli = Cli::try_parse_from(["armenu", "list", "--category", "Çorba", "--page", "2", "--limit", "5"]).unwrap();
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.category.as_deref(), Some("Çorba"));
                assert_eq!(args.page, Some(2));
                assert_eq!(args.limit, Some(5));
                assert!(!args.ar_only);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn ar_platform_and_user_agent_conflict() {
        assert!(Cli::try_parse_from(["armenu", "ar", "3", "--platform", "ios", "--user-agent", "Mozilla"]).is_err());
        let cli = Cli::try_parse_from(["armenu", "ar", "3", "--platform", "ios"]).unwrap();
        assert!(matches!(cli.command, Command::Ar { id: 3, platform: Some(Platform::Ios), .. }));
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("armenu.json");
        std::fs::write(&file, r#"{ "api_base_url": "http://file.example/", "request_timeout_ms": 1500 }"#).unwrap();

        let opts = GlobalOpts {
            config: Some(file),
            api_base_url: Some("http://flag.example/".to_string()),
            admin_key: Some("   ".to_string()),
            ..Default::default()
        };
        let config = opts.client_config().unwrap();
        assert_eq!(config.api_base_url, "http://flag.example/");
        assert_eq!(config.request_timeout_ms, 1500);
    }

    #[test]
    fn add_args_mark_ar_when_a_model_is_given() {
        let args = AddArgs {
            name: "Lahmacun".to_string(),
            category: "Fırın".to_string(),
            price: "₺95".to_string(),
            description: String::new(),
            glb: Some("/models/lahmacun.glb".to_string()),
            usdz: None,
            image: None,
            dietary: vec![" spicy ".to_string(), "".to_string()],
        };
        let item = args.into_new_item();
        assert!(item.has_ar_model);
        assert_eq!(item.dietary, vec!["spicy"]);
    }
}
