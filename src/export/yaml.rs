//! YAML export
//!
//! Same document as the JSON backup, for reading by eye.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::FullExport;
use crate::storage::BudgetStore;

fn export_err(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Export(e.to_string())
}

/// Export the full store to YAML
pub fn export_full_yaml<W: Write>(store: &BudgetStore, writer: &mut W) -> BudgetResult<()> {
    let export = FullExport::from_store(store)?;

    writeln!(writer, "# Fortnight budget export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> BudgetResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| BudgetError::Import(e.to_string()))?;

    export.validate().map_err(BudgetError::Import)?;

    Ok(export)
}
