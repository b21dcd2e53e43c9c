mod config;
mod menu;

use anyhow::{Context, Result};
use clap::Parser;
use config::{CliConfig, Config};
use ledger_core::{Ledger, LoadOutcome};
use menu::Menu;
use std::io;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = CliConfig::parse();

    run(&config)?;

    info!("Session ended");

    Ok(())
}

fn run<C: Config>(config: &C) -> Result<()> {
    let mut ledger = Ledger::new(config.bank_name());

    let path = config.data_path();
    match ledger
        .load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?
    {
        LoadOutcome::NotFound => println!("No previous data found. Starting fresh."),
        LoadOutcome::Loaded { .. } => println!("Bank data loaded successfully."),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(stdin.lock(), stdout.lock())
        .run(&mut ledger)
        .context("Menu I/O failed")?;

    ledger
        .save(path)
        .with_context(|| format!("Failed to save {}", path.display()))?;

    println!("Bank data saved successfully.");
    println!("Thank you for banking with us!");

    Ok(())
}
