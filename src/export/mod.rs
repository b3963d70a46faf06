//! Export and import
//!
//! - CSV: budget history, one row per snapshot (spreadsheet-compatible)
//! - JSON: full store backup, re-importable
//! - YAML: full store export for reading

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_history_csv, import_history_csv, HISTORY_CSV_HEADER};
pub use json::{export_full_json, import_from_json, restore_export, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
