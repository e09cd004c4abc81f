#![allow(clippy::print_stdout)]

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use anyhow::{Context, Result};
use clap::Parser;
use pheco::domain::config::AppConfig;
use pheco::events::EventBus;
use pheco::features::registration::Registration;
use pheco::kernel::config::load_config;
use pheco_logger::{LevelFilter, Logger, parse_level};

#[pheco_runtime::main(memory_efficient)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config: AppConfig = load_config(cli.config.as_ref())?;
    let _logger = init_logger(&config, cli.verbose)?;

    let events = EventBus::new();
    let slices = pheco::init(&config, &events).map_err(|e| anyhow::anyhow!("{e}"))?;
    let registration = slices
        .iter()
        .find_map(|slice| slice.downcast_ref::<Registration>())
        .context("Registration slice is not initialized")?;

    match cli.command {
        Command::Steps {} => commands::list_steps(),
        Command::Validate { draft } => commands::validate(&draft).await?,
        Command::Review { draft } => commands::review(&draft).await?,
        Command::Register { draft, save } => commands::register(registration, &draft, save).await?,
    }

    Ok(())
}

fn init_logger(config: &AppConfig, verbose: bool) -> Result<Logger> {
    let level = if verbose { LevelFilter::DEBUG } else { parse_level(&config.logging.level)? };

    let mut builder = Logger::builder().name(env!("CARGO_BIN_NAME")).console(true).level(level);
    if let Some(directory) = &config.logging.directory {
        builder = builder.path(directory).json(config.logging.json);
    }
    Ok(builder.init()?)
}
