//! Storage initialization
//!
//! First-run setup: directories, empty record files and default settings.

use crate::config::paths::FortnightPaths;
use crate::config::settings::Settings;
use crate::error::BudgetError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched, so running it twice is harmless.
pub fn initialize_storage(paths: &FortnightPaths) -> Result<(), BudgetError> {
    paths.ensure_directories()?;

    for file in [
        paths.bills_file(),
        paths.debts_file(),
        paths.goals_file(),
        paths.history_file(),
    ] {
        if !file.exists() {
            write_json_atomic(&file, &Vec::<serde_json::Value>::new())?;
        }
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &FortnightPaths) -> bool {
    !paths.is_initialized()
}
