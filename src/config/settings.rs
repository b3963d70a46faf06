//! User settings for Fortnight
//!
//! Holds display preferences and the last values entered for a budget
//! calculation, so `budget calc` can be re-run without repeating every flag.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::paths::FortnightPaths;
use crate::engine::BillSelection;
use crate::error::BudgetError;
use crate::models::{Money, PayCycleWindow};

/// Last values entered for a budget calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BudgetDefaults {
    #[serde(default)]
    pub income1: Money,
    #[serde(default)]
    pub income2: Money,
    #[serde(default)]
    pub splurge: Money,
    #[serde(default)]
    pub fire_pct: Decimal,
    #[serde(default)]
    pub smile_pct: Decimal,
    #[serde(default)]
    pub bill_selection: BillSelection,
    /// Start of the last pay cycle used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_cycle_start: Option<NaiveDate>,
}

impl BudgetDefaults {
    pub fn total_income(&self) -> Money {
        self.income1 + self.income2
    }

    pub fn pay_cycle(&self) -> Option<PayCycleWindow> {
        self.pay_cycle_start.map(PayCycleWindow::new)
    }
}

/// User settings for Fortnight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub budget: BudgetDefaults,

    /// Directory of the file-backed remote row store, if sync is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_dir: Option<PathBuf>,

    /// Push every change to the remote row store after saving locally
    #[serde(default)]
    pub auto_push: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            budget: BudgetDefaults::default(),
            remote_dir: None,
            auto_push: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FortnightPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FortnightPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format a date with the configured date format
    pub fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    /// Remote directory from the settings, falling back to `<base>/remote`
    pub fn remote_dir(&self, paths: &FortnightPaths) -> PathBuf {
        self.remote_dir.clone().unwrap_or_else(|| paths.remote_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.budget.fire_pct, Decimal::ZERO);
        assert_eq!(settings.budget.bill_selection, BillSelection::DueInWindow);
        assert!(settings.budget.pay_cycle().is_none());
        assert!(!settings.auto_push);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FortnightPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "€".to_string();
        settings.budget.income1 = Money::from_cents(250000);
        settings.budget.fire_pct = dec!(12.5);
        settings.budget.pay_cycle_start = NaiveDate::from_ymd_opt(2024, 1, 15);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.budget, settings.budget);
        assert_eq!(
            loaded.budget.pay_cycle().unwrap().end_date(),
            NaiveDate::from_ymd_opt(2024, 1, 28).unwrap()
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "£"}"#).unwrap();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.budget, BudgetDefaults::default());
    }

    #[test]
    fn test_remote_dir_fallback() {
        let paths = FortnightPaths::with_base_dir(PathBuf::from("/tmp/fortnight-test"));
        let mut settings = Settings::default();
        assert_eq!(settings.remote_dir(&paths), paths.remote_dir());

        settings.remote_dir = Some(PathBuf::from("/srv/rows"));
        assert_eq!(settings.remote_dir(&paths), PathBuf::from("/srv/rows"));
    }
}
