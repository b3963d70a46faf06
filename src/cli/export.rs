//! CLI commands for data export
//!
//! Every export writes to stdout unless `--output` names a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{BudgetError, BudgetResult};
use crate::export::{csv, json, yaml};
use crate::services::HistoryService;
use crate::storage::BudgetStore;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Full backup as JSON
    Json {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Full export as YAML
    Yaml {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Budget history as CSV
    Csv {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: Option<&PathBuf>) -> BudgetResult<Box<dyn Write>> {
    match output {
        None => Ok(Box::new(io::stdout().lock())),
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

/// Handle export commands
pub fn handle_export_command(store: &BudgetStore, cmd: ExportCommands) -> BudgetResult<()> {
    let output = match &cmd {
        ExportCommands::Json { output, .. }
        | ExportCommands::Yaml { output }
        | ExportCommands::Csv { output } => output.clone(),
    };
    let mut writer = open_output(output.as_ref())?;

    let what = match cmd {
        ExportCommands::Json { compact, .. } => {
            json::export_full_json(store, &mut writer, !compact)?;
            writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;
            "Full backup"
        }
        ExportCommands::Yaml { .. } => {
            yaml::export_full_yaml(store, &mut writer)?;
            "Full export"
        }
        ExportCommands::Csv { .. } => {
            // Oldest first reads naturally in a spreadsheet
            let mut snapshots = HistoryService::new(store).list()?;
            snapshots.reverse();
            csv::export_history_csv(&snapshots, &mut writer)?;
            "Budget history"
        }
    };
    writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    if let Some(path) = output {
        println!("{} exported to: {}", what, path.display());
    }
    Ok(())
}
