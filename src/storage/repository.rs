//! Record repositories for JSON storage
//!
//! Each repository owns one JSON file holding an array of records. Records
//! keep their insertion order, which is also the order listings and the
//! engine see them in.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Bill, BudgetSnapshot, Debt, Goal};

use super::file_io::{read_json, write_json_atomic};

/// A record that can be kept in a [`Repository`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    const ENTITY: EntityType;

    /// Full id of the record
    fn record_id(&self) -> &str;

    /// Name shown in listings and the audit log
    fn display_name(&self) -> Option<String>;

    /// Whether `identifier` (full id, short id prefix) refers to this record
    fn has_id(&self, identifier: &str) -> bool;

    fn not_found(identifier: &str) -> BudgetError;
}

macro_rules! named_record {
    ($ty:ty, $entity:expr, $not_found:path) => {
        impl Record for $ty {
            const ENTITY: EntityType = $entity;

            fn record_id(&self) -> &str {
                self.id.as_str()
            }

            fn display_name(&self) -> Option<String> {
                Some(self.name.clone())
            }

            fn has_id(&self, identifier: &str) -> bool {
                self.id.matches(identifier)
            }

            fn not_found(identifier: &str) -> BudgetError {
                $not_found(identifier)
            }
        }
    };
}

named_record!(Bill, EntityType::Bill, BudgetError::bill_not_found);
named_record!(Debt, EntityType::Debt, BudgetError::debt_not_found);
named_record!(Goal, EntityType::Goal, BudgetError::goal_not_found);

impl Record for BudgetSnapshot {
    const ENTITY: EntityType = EntityType::Snapshot;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn display_name(&self) -> Option<String> {
        Some(self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    fn has_id(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }

    fn not_found(identifier: &str) -> BudgetError {
        BudgetError::snapshot_not_found(identifier)
    }
}

/// Repository for one record type
pub struct Repository<T: Record> {
    path: PathBuf,
    data: RwLock<Vec<T>>,
}

impl<T: Record> Repository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> BudgetResult<RwLockReadGuard<'_, Vec<T>>> {
        self.data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> BudgetResult<RwLockWriteGuard<'_, Vec<T>>> {
        self.data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load records from disk, replacing what is in memory
    pub fn load(&self) -> BudgetResult<()> {
        let records: Vec<T> = read_json(&self.path)?;
        *self.write()? = records;
        Ok(())
    }

    /// Save records to disk
    pub fn save(&self) -> BudgetResult<()> {
        let data = self.read()?;
        write_json_atomic(&self.path, &*data)
    }

    /// Get a record by its full id
    pub fn get(&self, id: &str) -> BudgetResult<Option<T>> {
        Ok(self.read()?.iter().find(|r| r.record_id() == id).cloned())
    }

    /// Resolve a user-supplied identifier to a single record
    ///
    /// Tries the full id, then an exact case-insensitive name, then a short
    /// id prefix. A prefix matching more than one record is an error.
    pub fn find(&self, identifier: &str) -> BudgetResult<T> {
        let data = self.read()?;
        let wanted = identifier.trim();

        if let Some(found) = data.iter().find(|r| r.record_id() == wanted) {
            return Ok(found.clone());
        }

        let by_name: Vec<&T> = data
            .iter()
            .filter(|r| {
                r.display_name()
                    .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
            })
            .collect();
        if let [only] = by_name.as_slice() {
            return Ok((*only).clone());
        }

        let by_id: Vec<&T> = data.iter().filter(|r| r.has_id(wanted)).collect();
        match (by_name.len(), by_id.as_slice()) {
            (0, [only]) => Ok((*only).clone()),
            (0, []) => Err(T::not_found(wanted)),
            _ => Err(BudgetError::Validation(format!(
                "'{}' matches more than one {}; use a longer id",
                wanted,
                T::ENTITY.to_string().to_lowercase()
            ))),
        }
    }

    /// All records in insertion order
    pub fn get_all(&self) -> BudgetResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    /// Insert a new record or replace the one with the same id in place
    pub fn upsert(&self, record: T) -> BudgetResult<()> {
        let mut data = self.write()?;
        match data.iter_mut().find(|r| r.record_id() == record.record_id()) {
            Some(existing) => *existing = record,
            None => data.push(record),
        }
        Ok(())
    }

    /// Swap the record stored under `old_id` for `record`, keeping its position
    ///
    /// Used when a record is given a new id. Returns false if `old_id` is unknown.
    pub fn replace(&self, old_id: &str, record: T) -> BudgetResult<bool> {
        let mut data = self.write()?;
        match data.iter_mut().find(|r| r.record_id() == old_id) {
            Some(existing) => {
                *existing = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a record by full id, returning it if it existed
    pub fn delete(&self, id: &str) -> BudgetResult<Option<T>> {
        let mut data = self.write()?;
        Ok(data
            .iter()
            .position(|r| r.record_id() == id)
            .map(|idx| data.remove(idx)))
    }

    /// Replace every record at once, returning how many were there before
    pub fn replace_all(&self, records: Vec<T>) -> BudgetResult<usize> {
        let mut data = self.write()?;
        let previous = data.len();
        *data = records;
        Ok(previous)
    }

    pub fn count(&self) -> BudgetResult<usize> {
        Ok(self.read()?.len())
    }
}
