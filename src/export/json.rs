//! JSON backup
//!
//! The whole store in one document with schema versioning. Importing a
//! backup replaces every local collection.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Bill, BudgetSnapshot, Debt, Goal};
use crate::storage::{BudgetStore, StoreContents};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full store export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    #[serde(default)]
    pub bills: Vec<Bill>,

    #[serde(default)]
    pub debts: Vec<Debt>,

    #[serde(default)]
    pub goals: Vec<Goal>,

    /// Snapshots, oldest first
    #[serde(default)]
    pub history: Vec<BudgetSnapshot>,
}

impl FullExport {
    /// Capture everything currently in the store
    pub fn from_store(store: &BudgetStore) -> BudgetResult<Self> {
        let contents = store.contents()?;
        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            bills: contents.bills,
            debts: contents.debts,
            goals: contents.goals,
            history: contents.history,
        })
    }

    /// Check the schema version, record validity and id uniqueness
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        for bill in &self.bills {
            bill.validate()
                .map_err(|e| format!("Bill '{}': {}", bill.name, e))?;
        }
        for debt in &self.debts {
            debt.validate()
                .map_err(|e| format!("Debt '{}': {}", debt.name, e))?;
        }
        for goal in &self.goals {
            goal.validate()
                .map_err(|e| format!("Goal '{}': {}", goal.name, e))?;
        }
        for snapshot in &self.history {
            snapshot
                .verify()
                .map_err(|e| format!("Snapshot '{}': {}", snapshot.id, e))?;
        }

        check_unique("bill", self.bills.iter().map(|b| b.id.as_str()))?;
        check_unique("debt", self.debts.iter().map(|d| d.id.as_str()))?;
        check_unique("goal", self.goals.iter().map(|g| g.id.as_str()))?;
        check_unique("snapshot", self.history.iter().map(|s| s.id.as_str()))?;

        Ok(())
    }

    pub fn into_contents(self) -> StoreContents {
        StoreContents {
            bills: self.bills,
            debts: self.debts,
            goals: self.goals,
            history: self.history,
        }
    }
}

fn check_unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(format!("Duplicate {} id {}", what, id));
        }
    }
    Ok(())
}

/// Export the full store to JSON
pub fn export_full_json<W: Write>(
    store: &BudgetStore,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    let export = FullExport::from_store(store)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> BudgetResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| BudgetError::Import(e.to_string()))?;

    export.validate().map_err(BudgetError::Import)?;

    Ok(export)
}

/// Replace the store with an export, returning how many records landed
///
/// The export is validated first; an invalid one leaves the store untouched.
pub fn restore_export(store: &BudgetStore, export: FullExport) -> BudgetResult<usize> {
    export.validate().map_err(BudgetError::Import)?;
    let contents = export.into_contents();
    let total =
        contents.bills.len() + contents.debts.len() + contents.goals.len() + contents.history.len();
    store.replace_all(contents, "import")?;
    Ok(total)
}
