use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use lib_armenu::ClientConfig;
use lib_armenu::hooks::{FetchState, ItemsQuery, UseArSession, UseCategories, UseItem, UseItems, UseQr};
use lib_armenu::menu::{ItemId, MenuApi, Platform, QrOptions};
use serde_json::json;
use tracing::warn;

use crate::config::{AdminCommand, Command, ListArgs};
use crate::pages;

/// Exit code for "the item does not exist".
const EXIT_NOT_FOUND: u8 = 2;

pub async fn run(command: Command, config: &ClientConfig, as_json: bool) -> Result<ExitCode> {
    let api = MenuApi::new(config).context("Failed to create API client")?;

    match command {
        Command::Health => health(&api, as_json).await,
        Command::List(args) => list(&api, args, as_json).await,
        Command::Categories => categories(&api, as_json).await,
        Command::Show { id } => show(&api, config, id, as_json).await,
        Command::Qr { id, out, size } => qr(&api, id, &out, size).await,
        Command::Ar { id, platform, user_agent } => {
            let platform = match (platform, user_agent) {
                (Some(p), _) => p,
                (None, Some(ua)) => Platform::from_user_agent(&ua),
                (None, None) => Platform::Web,
            };
            ar(&api, id, platform, as_json).await
        }
        Command::Admin(cmd) => admin(&api, cmd, as_json).await,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// Ready data or an error carrying the page's failure message
fn settle<T>(state: FetchState<T>, what: &str) -> Result<T> {
    match state {
        FetchState::Ready(data) => Ok(data),
        FetchState::Failed(e) => Err(anyhow!(pages::failure_message(what, &e))),
        FetchState::Idle | FetchState::Loading => bail!("Loading {} did not finish", what),
    }
}

async fn health(api: &MenuApi, as_json: bool) -> Result<ExitCode> {
    let status = api
        .health
        .check()
        .await
        .map_err(|e| anyhow!(pages::failure_message("health status", &e)))?;
    if as_json {
        print_json(&status)?;
    } else {
        print!("{}", pages::render_health(&status));
    }
    Ok(if status.is_healthy() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn list(api: &MenuApi, args: ListArgs, as_json: bool) -> Result<ExitCode> {
    if args.ar_only {
        let items = api
            .items
            .get_ar_items()
            .await
            .map_err(|e| anyhow!(pages::failure_message("AR items", &e)))?;
        if as_json {
            print_json(&items)?;
        } else {
            print!("{}", pages::render_items(&items, None));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let query = ItemsQuery {
        category: args.category,
        search: args.search,
        page: args.page,
        limit: args.limit,
    };
    let hook = UseItems::new(api.items.clone(), query);
    let page = settle(hook.fetch().await, "menu items")?;

    if as_json {
        print_json(&json!({ "items": page.items, "pagination": page.pagination }))?;
    } else {
        print!("{}", pages::render_items(&page.items, page.pagination.as_ref()));
    }
    Ok(ExitCode::SUCCESS)
}

async fn categories(api: &MenuApi, as_json: bool) -> Result<ExitCode> {
    let hook = UseCategories::new(api.items.clone());
    let categories = settle(hook.fetch().await, "categories")?;
    if as_json {
        print_json(&categories)?;
    } else {
        print!("{}", pages::render_categories(&categories));
    }
    Ok(ExitCode::SUCCESS)
}

async fn show(api: &MenuApi, config: &ClientConfig, id: ItemId, as_json: bool) -> Result<ExitCode> {
    let hook = UseItem::new(api.items.clone(), id, config.item_retry.clone());
    let state = hook.fetch().await;
    if state.is_not_found() {
        eprintln!("{}", pages::not_found_message(id));
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    }
    let detail = settle(state, "item")?;

    let nutrition = match detail.nutrition.clone() {
        Some(facts) => Some(facts),
        None => match api.nutrition.get(id).await {
            Ok(facts) => facts,
            Err(e) => {
                warn!(item_id = id, error = %e, "nutrition facts unavailable");
                None
            }
        },
    };

    if as_json {
        print_json(&json!({ "item": detail, "nutrition": nutrition }))?;
    } else {
        print!("{}", pages::render_item_detail(&detail, nutrition.as_ref()));
    }
    Ok(ExitCode::SUCCESS)
}

async fn qr(api: &MenuApi, id: ItemId, out: &std::path::Path, size: u32) -> Result<ExitCode> {
    let options = QrOptions {
        size,
        ..Default::default()
    };
    let hook = UseQr::new(api.qr.clone(), id, options);
    let state = hook.fetch().await;
    if state.is_not_found() {
        eprintln!("{}", pages::not_found_message(id));
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    }
    let code = settle(state, "QR code")?;
    code.save(out)?;
    println!("Saved QR code for {} to {}", code.target_url, out.display());
    Ok(ExitCode::SUCCESS)
}

async fn ar(api: &MenuApi, id: ItemId, platform: Platform, as_json: bool) -> Result<ExitCode> {
    let hook = UseArSession::new(api.items.clone(), api.ar.clone(), id, platform);
    let state = hook.start().await;
    if state.is_not_found() {
        eprintln!("{}", pages::not_found_message(id));
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    }
    let session = settle(state, "AR session")?;
    if as_json {
        print_json(&session)?;
    } else {
        print!("{}", pages::render_ar_session(&session));
    }
    hook.flush_tracking().await;
    Ok(ExitCode::SUCCESS)
}

async fn admin(api: &MenuApi, command: AdminCommand, as_json: bool) -> Result<ExitCode> {
    let admin = &api.admin;
    match command {
        AdminCommand::Verify => {
            let valid = admin.verify().await?;
            println!("{}", if valid { "Admin key accepted" } else { "Admin key rejected" });
            Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        AdminCommand::List => {
            let items = admin.list_items().await?;
            if as_json {
                print_json(&items)?;
            } else {
                print!("{}", pages::render_items(&items, None));
            }
            Ok(ExitCode::SUCCESS)
        }
        AdminCommand::Add(args) => {
            let created = admin
                .add_item(&args.into_new_item())
                .await
                .map_err(|e| anyhow!(pages::failure_message("new item", &e)))?;
            if as_json {
                print_json(&created)?;
            } else {
                println!("Added item {} ({})", created.id, created.name);
            }
            Ok(ExitCode::SUCCESS)
        }
        AdminCommand::Delete { id } => match admin.delete_item(id).await {
            Ok(()) => {
                println!("Deleted item {}", id);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) if e.is_not_found() => {
                eprintln!("{}", pages::not_found_message(id));
                Ok(ExitCode::from(EXIT_NOT_FOUND))
            }
            Err(e) => Err(e.into()),
        },
    }
}
