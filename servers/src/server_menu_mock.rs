use anyhow::{Context, Result};
use lib_armenu::loggers::setup::{LogFormat, setup_logging};
use servers::menu_mock::{self, MockState, catalog, config};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let _logging = setup_logging(
        "server_menu_mock",
        config.log_dir.as_deref(),
        config.log_level.as_deref().unwrap_or("info"),
        LogFormat::Text,
    )?;

    let state = match &config.catalog_path {
        Some(path) => MockState::new(catalog::load_items(path)?, Default::default(), config.admin_key.clone()),
        None => MockState::demo(config.admin_key.clone()),
    };
    if config.admin_key.is_none() {
        info!("No admin key configured; admin routes will reject every request.");
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    menu_mock::serve(listener, state, shutdown_signal()).await?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Ctrl-C received, initiating shutdown.");
        }
        _ = async {
            #[cfg(unix)]
            {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut term_signal) => {
                        term_signal.recv().await;
                        info!("SIGTERM received, initiating shutdown.");
                    }
                    Err(_) => std::future::pending::<()>().await,
                }
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {}
    }
}
