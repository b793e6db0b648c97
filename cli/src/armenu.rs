//! # armenu
//!
//! Terminal front-end for the AR menu. Each subcommand plays the role of one
//! page: menu list, categories, item detail, QR code, AR viewer and admin.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use lib_armenu::loggers::{LogFormat, setup_logging};

mod commands;
mod config;
mod pages;

use config::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // .env first so clap's env fallbacks can see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _logging = setup_logging("armenu", cli.global.log_dir.as_deref(), &cli.global.log_level, LogFormat::Text)?;

    let client_config = cli.global.client_config()?;
    commands::run(cli.command, &client_config, cli.global.json).await
}
