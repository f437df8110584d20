#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{generate, modules, plan};
use crate::models::args::{AppCommands, Cli};

use anyhow::{Context, Result};
use clap::Parser;
use modkit::domain::config::AppConfig;
use modkit::kernel::config::load_config;
use modkit_logger::Logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config: AppConfig = load_config(cli.config.as_deref()).context("Configuration is malformed")?;
    let _log = Logger::from_settings(env!("CARGO_PKG_NAME"), &config.logging)?;

    match cli.command {
        AppCommands::Modules {} => modules::list_modules(&config),
        AppCommands::Plan { module } => plan::print_plan(&config, module.as_deref())?,
        AppCommands::Generate { kind, name, module, service } => {
            generate::generate(&config, kind, &name, module.as_deref(), service.as_deref())?;
        },
    }

    Ok(())
}
