//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod bill;
pub mod budget;
pub mod config;
pub mod debt;
pub mod export;
pub mod goal;
pub mod history;
pub mod import;
pub mod sync;

pub use audit::handle_audit_command;
pub use bill::{handle_bill_command, BillCommands};
pub use budget::{handle_budget_command, handle_dashboard_command, BudgetCommands};
pub use config::{handle_config_command, handle_init_command, ConfigArgs};
pub use debt::{handle_debt_command, DebtCommands};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use history::{handle_history_command, HistoryCommands};
pub use import::{handle_import_command, ImportCommands};
pub use sync::{handle_sync_command, SyncCommands};

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{parse_bill_date, CustomUnit, Frequency, Money, PayCycleWindow, Priority};
use crate::storage::BudgetStore;
use crate::sync::{FileRowStore, SyncService, Syncable};

/// Today in the local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_money(raw: &str, what: &str) -> BudgetResult<Money> {
    Money::parse(raw).map_err(|e| {
        BudgetError::Validation(format!(
            "Invalid {} '{}'. Use a format like '120.50' or '120'. Error: {}",
            what, raw, e
        ))
    })
}

/// Parse a date argument; "today" is accepted
pub(crate) fn parse_date(raw: &str) -> BudgetResult<NaiveDate> {
    if raw.trim().eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    parse_bill_date(raw)
}

/// Parse a pay cycle start; "today" starts a cycle today
pub(crate) fn parse_cycle(raw: &str) -> BudgetResult<PayCycleWindow> {
    if raw.trim().eq_ignore_ascii_case("today") {
        return Ok(PayCycleWindow::new(today()));
    }
    PayCycleWindow::parse(raw).map_err(|e| BudgetError::Validation(e.to_string()))
}

pub(crate) fn parse_percent(raw: &str, what: &str) -> BudgetResult<Decimal> {
    Decimal::from_str(raw.trim().trim_end_matches('%')).map_err(|_| {
        BudgetError::Validation(format!("Invalid {} percentage '{}'", what, raw))
    })
}

pub(crate) fn parse_priority(raw: &str) -> BudgetResult<Priority> {
    Priority::parse(raw).ok_or_else(|| {
        BudgetError::Validation(format!(
            "Invalid priority '{}'. Valid priorities: low, medium, high",
            raw
        ))
    })
}

/// Build a frequency from `--frequency`, `--every` and `--unit`
///
/// `custom` takes the interval from `--every` (default 1) and `--unit`
/// (default week). Giving `--every` or `--unit` alone implies `custom`.
pub(crate) fn parse_frequency(
    label: Option<&str>,
    every: Option<u32>,
    unit: Option<&str>,
) -> BudgetResult<Option<Frequency>> {
    let wants_custom = label.is_some_and(|l| l.trim().eq_ignore_ascii_case("custom"))
        || (label.is_none() && (every.is_some() || unit.is_some()));

    if !wants_custom {
        return match label {
            None => Ok(None),
            Some(l) => Frequency::parse(l).map(Some).ok_or_else(|| {
                BudgetError::Validation(format!(
                    "Invalid frequency '{}'. Valid frequencies: once-off, weekly, fortnightly, monthly, annually, custom",
                    l
                ))
            }),
        };
    }

    let unit = match unit {
        None => CustomUnit::Week,
        Some(raw) => CustomUnit::parse(raw).ok_or_else(|| {
            BudgetError::Validation(format!(
                "Invalid unit '{}'. Valid units: day, week, month, year",
                raw
            ))
        })?,
    };
    Ok(Some(Frequency::custom(unit, every.unwrap_or(1))))
}

/// Mirrors local changes to the remote row store when auto-push is on
pub(crate) struct AutoPush<'a> {
    sync: Option<SyncService<'a>>,
}

impl<'a> AutoPush<'a> {
    pub fn new(store: &'a BudgetStore, remote: Option<&'a FileRowStore>) -> Self {
        Self {
            sync: remote.map(|r| SyncService::new(store, r)),
        }
    }

    /// The remote row store to mirror to, if auto-push is enabled
    pub fn remote_for(store: &BudgetStore, settings: &Settings) -> Option<FileRowStore> {
        settings
            .auto_push
            .then(|| FileRowStore::new(settings.remote_dir(store.paths())))
    }

    pub fn created<T: Syncable>(&self, record: T) -> BudgetResult<T> {
        match &self.sync {
            Some(sync) => sync.push_created(&record),
            None => Ok(record),
        }
    }

    pub fn updated<T: Syncable>(&self, record: &T) {
        if let Some(sync) = &self.sync {
            sync.push_updated(record);
        }
    }

    pub fn deleted<T: Syncable>(&self, record: &T) {
        if let Some(sync) = &self.sync {
            sync.push_deleted(record);
        }
    }
}
