//! Row stores
//!
//! [`RowStore`] is the seam to the hosted datastore: plain row CRUD over
//! four tables. Two implementations ship with the crate, an in-memory one
//! and one that keeps each table as a JSON file in a directory (handy for a
//! shared folder or for testing a sync round trip by hand).

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::RwLock;

use serde_json::Value;

use super::records::{row_id, Row};
use crate::error::{BudgetError, BudgetResult};
use crate::storage::file_io::{read_json, write_json_atomic};

/// Remote tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Bills,
    Debts,
    Goals,
    Snapshots,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Bills, Table::Debts, Table::Goals, Table::Snapshots];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Bills => "bills",
            Table::Debts => "debts",
            Table::Goals => "goals",
            Table::Snapshots => "snapshots",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic row CRUD against the hosted datastore
pub trait RowStore {
    /// Every row of `table`, in insertion order
    fn select_all(&self, table: Table) -> BudgetResult<Vec<Row>>;

    /// Insert a row; the returned row carries the id the store assigned
    fn insert(&self, table: Table, row: Row) -> BudgetResult<Row>;

    /// Overwrite the given columns of the row with `id`
    fn update(&self, table: Table, id: &str, row: Row) -> BudgetResult<()>;

    /// Delete the row with `id`, returning how many rows went away
    fn delete(&self, table: Table, id: &str) -> BudgetResult<usize>;
}

fn insert_row(rows: &mut Vec<Row>, mut row: Row) -> Row {
    let next_id = rows
        .iter()
        .filter_map(|r| row_id(r)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    row.insert("id".into(), Value::from(next_id));
    rows.push(row.clone());
    row
}

fn update_row(rows: &mut [Row], table: Table, id: &str, row: Row) -> BudgetResult<()> {
    let existing = rows
        .iter_mut()
        .find(|r| row_id(r).as_deref() == Some(id))
        .ok_or_else(|| BudgetError::Sync(format!("No row {} in {}", id, table)))?;
    for (column, value) in row {
        if column != "id" {
            existing.insert(column, value);
        }
    }
    Ok(())
}

fn delete_row(rows: &mut Vec<Row>, id: &str) -> usize {
    let before = rows.len();
    rows.retain(|r| row_id(r).as_deref() != Some(id));
    before - rows.len()
}

/// Row store held entirely in memory
#[derive(Default)]
pub struct MemoryRowStore {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_table<R>(&self, table: Table, f: impl FnOnce(&mut Vec<Row>) -> R) -> BudgetResult<R> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| BudgetError::Sync(format!("Failed to acquire write lock: {}", e)))?;
        Ok(f(tables.entry(table).or_default()))
    }
}

impl RowStore for MemoryRowStore {
    fn select_all(&self, table: Table) -> BudgetResult<Vec<Row>> {
        self.with_table(table, |rows| rows.clone())
    }

    fn insert(&self, table: Table, row: Row) -> BudgetResult<Row> {
        self.with_table(table, |rows| insert_row(rows, row))
    }

    fn update(&self, table: Table, id: &str, row: Row) -> BudgetResult<()> {
        self.with_table(table, |rows| update_row(rows, table, id, row))?
    }

    fn delete(&self, table: Table, id: &str) -> BudgetResult<usize> {
        self.with_table(table, |rows| delete_row(rows, id))
    }
}

/// Row store keeping one `<table>.json` file per table in a directory
pub struct FileRowStore {
    dir: PathBuf,
}

impl FileRowStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn table_file(&self, table: Table) -> PathBuf {
        self.dir.join(format!("{}.json", table))
    }

    fn modify<R>(
        &self,
        table: Table,
        f: impl FnOnce(&mut Vec<Row>) -> BudgetResult<R>,
    ) -> BudgetResult<R> {
        let path = self.table_file(table);
        let mut rows: Vec<Row> = read_json(&path).map_err(|e| BudgetError::Sync(e.to_string()))?;
        let result = f(&mut rows)?;
        write_json_atomic(&path, &rows).map_err(|e| BudgetError::Sync(e.to_string()))?;
        Ok(result)
    }
}

impl RowStore for FileRowStore {
    fn select_all(&self, table: Table) -> BudgetResult<Vec<Row>> {
        read_json(self.table_file(table)).map_err(|e| BudgetError::Sync(e.to_string()))
    }

    fn insert(&self, table: Table, row: Row) -> BudgetResult<Row> {
        self.modify(table, |rows| Ok(insert_row(rows, row)))
    }

    fn update(&self, table: Table, id: &str, row: Row) -> BudgetResult<()> {
        self.modify(table, |rows| update_row(rows, table, id, row))
    }

    fn delete(&self, table: Table, id: &str) -> BudgetResult<usize> {
        self.modify(table, |rows| Ok(delete_row(rows, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn exercise(store: &dyn RowStore) {
        let first = store.insert(Table::Bills, row(json!({"name": "Rent"}))).unwrap();
        let second = store.insert(Table::Bills, row(json!({"name": "Power"}))).unwrap();
        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));

        store
            .update(Table::Bills, "1", row(json!({"name": "Rent (new)", "id": 99})))
            .unwrap();
        let rows = store.select_all(Table::Bills).unwrap();
        assert_eq!(rows[0]["name"], json!("Rent (new)"));
        assert_eq!(rows[0]["id"], json!(1));

        assert!(store.update(Table::Bills, "7", Row::new()).is_err());
        assert_eq!(store.delete(Table::Bills, "2").unwrap(), 1);
        assert_eq!(store.delete(Table::Bills, "2").unwrap(), 0);
        assert_eq!(store.select_all(Table::Bills).unwrap().len(), 1);
        assert!(store.select_all(Table::Goals).unwrap().is_empty());
    }

    #[test]
    fn test_memory_row_store() {
        exercise(&MemoryRowStore::new());
    }

    #[test]
    fn test_file_row_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileRowStore::new(temp_dir.path().join("remote"));
        exercise(&store);

        assert!(temp_dir.path().join("remote").join("bills.json").exists());
        let reopened = FileRowStore::new(temp_dir.path().join("remote"));
        assert_eq!(reopened.select_all(Table::Bills).unwrap().len(), 1);
    }
}
