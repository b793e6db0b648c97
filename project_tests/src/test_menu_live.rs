//! # Menu API Live Smoke Run
//!
//! Calls every read-only client operation against a running backend and
//! prints what came back. Point it at `server_menu_mock` or a real backend.

use anyhow::Result;
use clap::Parser;
use lib_armenu::ClientConfig;
use lib_armenu::configs::client_config::ClientConfigOverrides;
use lib_armenu::loggers::{LogFormat, setup_logging};
use lib_armenu::menu::{ItemFilters, MenuApi, Platform, QrOptions};

#[derive(Parser, Debug)]
#[command(about = "Smoke-test the menu client against a live backend")]
struct Args {
    /// Base URL of the backend.
    #[arg(long, env = "ARMENU_API_BASE_URL", default_value = "http://127.0.0.1:5000/")]
    api_base_url: String,

    /// Logging level.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _logging = setup_logging("test_menu_live", None, &args.log_level, LogFormat::Text)?;

    let config = ClientConfig::default().apply(ClientConfigOverrides {
        api_base_url: Some(args.api_base_url),
        ..Default::default()
    });
    let api = MenuApi::new(&config)?;

    println!("[*] Health");
    println!("{:?}", api.health.check().await?);

    println!("\n[*] Items");
    let items = api.items.get_all(&ItemFilters::default()).await?;
    println!("{} items", items.len());

    println!("\n[*] Categories");
    for category in api.items.get_categories().await? {
        println!("  {} ({})", category.name, category.count);
    }

    println!("\n[*] First page (limit 2)");
    let page = api.items.get_paginated(1, 2).await?;
    println!("{:?}", page.pagination);

    if let Some(first) = items.first() {
        println!("\n[*] Item {} detail and nutrition", first.id);
        let detail = api.items.get_by_id(first.id).await?;
        println!("{}", serde_json::to_string_pretty(&detail)?);
        println!("{:?}", api.nutrition.get(first.id).await?);

        println!("\n[*] QR code for item {}", first.id);
        match api.qr.fetch_png(first.id, QrOptions::default()).await {
            Ok(code) => println!("{} bytes, encodes {}", code.png.len(), code.target_url),
            Err(e) => eprintln!(">>> {}", e),
        }
    }

    if let Some(ar_item) = api.items.get_ar_items().await?.into_iter().next() {
        println!("\n[*] AR launch links for item {}", ar_item.id);
        for platform in [Platform::Android, Platform::Ios, Platform::Web] {
            match api.ar.resolve_model(&ar_item, platform) {
                Ok(model) => println!("  {}: {}", platform, api.ar.launch_url(&ar_item, &model, platform)?),
                Err(e) => println!("  {}: {}", platform, e),
            }
        }
    }

    Ok(())
}
