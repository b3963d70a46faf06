//! CLI commands for data import
//!
//! JSON and YAML backups replace every collection. A history CSV replaces
//! only the saved calculations.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{BudgetError, BudgetResult};
use crate::export::{import_from_json, import_from_yaml, import_history_csv, restore_export};
use crate::storage::BudgetStore;

/// Import subcommands
#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Restore a JSON backup, replacing all data
    Json {
        /// Backup file
        file: PathBuf,
    },
    /// Restore a YAML export, replacing all data
    Yaml {
        /// Export file
        file: PathBuf,
    },
    /// Load budget history from CSV, replacing saved calculations
    Csv {
        /// History CSV file
        file: PathBuf,
    },
}

fn read_file(path: &Path) -> BudgetResult<String> {
    if !path.exists() {
        return Err(BudgetError::Import(format!(
            "File not found: {}",
            path.display()
        )));
    }
    std::fs::read_to_string(path)
        .map_err(|e| BudgetError::Import(format!("Failed to read file: {}", e)))
}

/// Handle import commands
pub fn handle_import_command(store: &BudgetStore, cmd: ImportCommands) -> BudgetResult<()> {
    match cmd {
        ImportCommands::Json { file } => {
            let export = import_from_json(&read_file(&file)?)?;
            let count = restore_export(store, export)?;
            println!("Restored {} records from {}", count, file.display());
        }

        ImportCommands::Yaml { file } => {
            let export = import_from_yaml(&read_file(&file)?)?;
            let count = restore_export(store, export)?;
            println!("Restored {} records from {}", count, file.display());
        }

        ImportCommands::Csv { file } => {
            if !file.exists() {
                return Err(BudgetError::Import(format!(
                    "File not found: {}",
                    file.display()
                )));
            }
            let reader = File::open(&file)
                .map_err(|e| BudgetError::Import(format!("Failed to open file: {}", e)))?;
            let mut history = import_history_csv(reader)?;
            history.sort_by_key(|s| s.timestamp);

            let mut contents = store.contents()?;
            let count = history.len();
            contents.history = history;
            store.replace_all(contents, "import")?;
            println!("Imported {} snapshots from {}", count, file.display());
        }
    }

    Ok(())
}
