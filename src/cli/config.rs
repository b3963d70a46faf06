//! Init and config commands

use std::path::PathBuf;

use clap::Args;
use log::info;

use crate::audit::{generate_diff, AuditEntry, EntityType};
use crate::config::paths::FortnightPaths;
use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::storage::init::initialize_storage;
use crate::storage::BudgetStore;

/// Options for `fortnight config`; with none given the current configuration is shown
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Currency symbol used when printing amounts
    #[arg(long)]
    pub currency: Option<String>,

    /// Date format (strftime, e.g. "%d/%m/%Y")
    #[arg(long)]
    pub date_format: Option<String>,

    /// Directory of the remote row store used by `sync`
    #[arg(long, value_name = "DIR")]
    pub remote: Option<PathBuf>,

    /// Push every change to the remote after saving locally
    #[arg(long, value_name = "BOOL")]
    pub auto_push: Option<bool>,
}

impl ConfigArgs {
    fn is_empty(&self) -> bool {
        self.currency.is_none()
            && self.date_format.is_none()
            && self.remote.is_none()
            && self.auto_push.is_none()
    }
}

/// Create the data directory, the empty record files and the settings file
pub fn handle_init_command(paths: &FortnightPaths, settings: &Settings) -> BudgetResult<()> {
    println!("Initializing Fortnight at: {}", paths.base_dir().display());
    initialize_storage(paths)?;
    settings.save(paths)?;
    println!("Initialization complete!");
    println!();
    println!("Run 'fortnight bill add <name> <amount>' to add your first bill.");
    Ok(())
}

/// Show or change the configuration
pub fn handle_config_command(
    store: &BudgetStore,
    settings: &Settings,
    args: ConfigArgs,
) -> BudgetResult<()> {
    let paths = store.paths();

    if args.is_empty() {
        print_config(paths, settings);
        return Ok(());
    }

    let mut updated = settings.clone();
    if let Some(currency) = args.currency {
        updated.currency_symbol = currency;
    }
    if let Some(format) = args.date_format {
        if format.trim().is_empty() {
            return Err(BudgetError::Validation(
                "Date format cannot be empty".into(),
            ));
        }
        updated.date_format = format;
    }
    if let Some(remote) = args.remote {
        updated.remote_dir = Some(remote);
    }
    if let Some(auto_push) = args.auto_push {
        updated.auto_push = auto_push;
    }

    updated.save(paths)?;
    info!("Settings saved to {}", paths.settings_file().display());

    let before = serde_json::to_value(settings)?;
    let after = serde_json::to_value(&updated)?;
    let diff = generate_diff(&before, &after);
    store.audit().log(&AuditEntry::update(
        EntityType::Settings,
        "settings",
        None,
        settings,
        &updated,
        diff,
    ))?;

    println!("Configuration updated.");
    println!();
    print_config(paths, &updated);
    Ok(())
}

fn print_config(paths: &FortnightPaths, settings: &Settings) {
    println!("Fortnight Configuration");
    println!("=======================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Data directory:   {}", paths.data_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Audit log:        {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
    println!(
        "  Remote:          {}",
        settings.remote_dir(paths).display()
    );
    println!("  Auto push:       {}", settings.auto_push);
}
