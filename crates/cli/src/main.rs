#![forbid(unsafe_code)]

mod args;
mod commands;
mod config;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use config::{Config, Overrides};
use plume_storage::{SheetStore, StoreError};
use std::process::ExitCode;

/// Full `EnvFilter` directive; wins over the configured level.
const LOG_FILTER_ENV: &str = "PLUME_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<StoreError>() {
                Some(store_err) => eprintln!("error [{}]: {err:#}", store_err.code()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let overrides = Overrides {
        config_path: cli.config,
        storage_dir: cli.storage_dir,
        log_level: cli.log_level,
    };
    let config = Config::resolve(&overrides, config::env_var)?;
    init_logging(&config.log_level);
    tracing::debug!(storage_dir = %config.storage_dir.display(), "config resolved");

    let store = SheetStore::open(&config.storage_dir).with_context(|| {
        format!(
            "failed to open sheet store in {}",
            config.storage_dir.display()
        )
    })?;
    let mut stdin = std::io::stdin().lock();
    commands::run(&store, cli.command, &config, &mut stdin)
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}
