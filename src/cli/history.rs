//! Budget history CLI commands

use clap::Subcommand;

use super::AutoPush;
use crate::config::settings::Settings;
use crate::display::budget::{format_history_list, format_snapshot_details};
use crate::error::BudgetResult;
use crate::services::HistoryService;
use crate::storage::BudgetStore;

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List saved calculations, newest first
    List {
        /// Number of snapshots to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one saved calculation
    Show {
        /// Snapshot ID
        snapshot: String,
    },
    /// Delete a saved calculation
    Delete {
        /// Snapshot ID
        snapshot: String,
    },
}

/// Handle a history command
pub fn handle_history_command(
    store: &BudgetStore,
    settings: &Settings,
    cmd: HistoryCommands,
) -> BudgetResult<()> {
    let service = HistoryService::new(store);

    match cmd {
        HistoryCommands::List { limit } => {
            let mut snapshots = service.list()?;
            if let Some(limit) = limit {
                snapshots.truncate(limit);
            }
            println!("{}", format_history_list(&snapshots, settings));
        }

        HistoryCommands::Show { snapshot } => {
            print!("{}", format_snapshot_details(&service.find(&snapshot)?, settings));
        }

        HistoryCommands::Delete { snapshot } => {
            let remote = AutoPush::remote_for(store, settings);
            let push = AutoPush::new(store, remote.as_ref());

            let deleted = service.delete(&snapshot)?;
            push.deleted(&deleted);
            println!(
                "Deleted snapshot {} from {}",
                deleted.id.short(),
                deleted.timestamp.format("%Y-%m-%d %H:%M")
            );
        }
    }

    Ok(())
}
