//! Subcommand execution.

use std::io::Write;

use anyhow::Context;
use stockpile_infra::{AppConfig, ErrorKind, InventorySession, JsonFileStore, SessionError};

use crate::cli::{Cli, Commands};

/// Process exit code for a failed run.
///
/// Usage errors exit with 2 (clap's convention), so the inventory failures
/// start at 3.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<SessionError>().map(SessionError::kind) {
        Some(ErrorKind::FileNotFound) => 3,
        Some(ErrorKind::PermissionDenied) => 4,
        Some(ErrorKind::Parse) => 5,
        Some(ErrorKind::KeyNotFound) => 6,
        Some(ErrorKind::Validation) => 7,
        Some(ErrorKind::Io) => 8,
        None => 1,
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let path = cli.file.unwrap_or_else(|| config.inventory_path.clone());
    let store = JsonFileStore::new(&path);

    let mut session = if cli.create {
        InventorySession::open_or_empty(store)
    } else {
        InventorySession::open(store)
    }
    .with_context(|| format!("failed to open inventory {}", path.display()))?;

    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Show => {
            writeln!(out, "Items Report")?;
            for line in session.report() {
                writeln!(out, "{line}")?;
            }
        }
        Commands::Get { item } => {
            let qty = session.quantity(&item)?;
            writeln!(out, "{} -> {qty}", item.trim())?;
        }
        Commands::Add { item, quantity } => {
            let current = session.add_item(&item, quantity)?;
            save(&mut session)?;
            writeln!(out, "{} -> {current}", item.trim())?;
        }
        Commands::Adjust { item, delta } => {
            let current = session.adjust(&item, delta)?;
            save(&mut session)?;
            writeln!(out, "{} -> {current}", item.trim())?;
        }
        Commands::Remove { item } => {
            let previous = session.remove_item(&item)?;
            save(&mut session)?;
            writeln!(out, "removed {} (had {previous})", item.trim())?;
        }
        Commands::Low { threshold } => {
            let threshold = match threshold {
                Some(threshold) => threshold,
                None => config
                    .low_stock_threshold()
                    .context("failed to read configuration")?,
            };
            writeln!(out, "Low items (below {threshold})")?;
            for (name, qty) in session.low_stock(threshold) {
                writeln!(out, "{name} -> {qty}")?;
            }
        }
    }

    Ok(())
}

fn save(session: &mut InventorySession<JsonFileStore>) -> anyhow::Result<()> {
    let path = session.store().path().display().to_string();
    session
        .save()
        .with_context(|| format!("failed to save inventory {path}"))
}
