//! Sync CLI commands
//!
//! Mirrors the local store to a file-backed row store, or rebuilds the
//! local store from it.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::storage::BudgetStore;
use crate::sync::{FileRowStore, SyncService};

/// Sync subcommands
#[derive(Subcommand)]
pub enum SyncCommands {
    /// Send every local record to the remote
    Push {
        /// Remote directory (default from config)
        #[arg(long, value_name = "DIR")]
        remote: Option<PathBuf>,
    },
    /// Replace local data with the remote's rows
    Refresh {
        /// Remote directory (default from config)
        #[arg(long, value_name = "DIR")]
        remote: Option<PathBuf>,
    },
}

/// Handle a sync command
pub fn handle_sync_command(
    store: &BudgetStore,
    settings: &Settings,
    cmd: SyncCommands,
) -> BudgetResult<()> {
    let (remote_dir, push) = match cmd {
        SyncCommands::Push { remote } => (remote, true),
        SyncCommands::Refresh { remote } => (remote, false),
    };
    let remote_dir = remote_dir.unwrap_or_else(|| settings.remote_dir(store.paths()));
    let remote = FileRowStore::new(remote_dir.clone());
    let service = SyncService::new(store, &remote);

    if push {
        let report = service.push_all()?;
        println!("Pushed to {}", remote_dir.display());
        println!("  Inserted: {}", report.inserted);
        println!("  Updated:  {}", report.updated);
        if report.failed > 0 {
            println!("  Failed:   {} (see log for details)", report.failed);
        }
    } else {
        let report = service.refresh()?;
        println!("Refreshed from {}", remote_dir.display());
        println!("  Bills:   {}", report.bills);
        println!("  Debts:   {}", report.debts);
        println!("  Goals:   {}", report.goals);
        println!("  History: {}", report.history);
        if report.skipped > 0 {
            println!("  Skipped {} malformed rows", report.skipped);
        }
    }

    Ok(())
}
