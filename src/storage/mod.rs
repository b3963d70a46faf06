//! Storage layer for Fortnight
//!
//! JSON file storage with atomic writes. [`BudgetStore`] is created once by
//! the application shell and handed by reference to every service; nothing
//! in the crate keeps data in globals.

pub mod file_io;
pub mod init;
pub mod repository;

pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, needs_initialization};
pub use repository::{Record, Repository};

use serde_json::Value;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FortnightPaths;
use crate::error::BudgetResult;
use crate::models::{Bill, BudgetSnapshot, Debt, Goal};

/// Every record held by the store, fully materialized
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreContents {
    pub bills: Vec<Bill>,
    pub debts: Vec<Debt>,
    pub goals: Vec<Goal>,
    pub history: Vec<BudgetSnapshot>,
}

/// Main storage coordinator that provides access to all repositories
pub struct BudgetStore {
    paths: FortnightPaths,
    pub bills: Repository<Bill>,
    pub debts: Repository<Debt>,
    pub goals: Repository<Goal>,
    /// Saved snapshots, oldest first
    pub history: Repository<BudgetSnapshot>,
    audit: AuditLogger,
}

impl BudgetStore {
    pub fn new(paths: FortnightPaths) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            bills: Repository::new(paths.bills_file()),
            debts: Repository::new(paths.debts_file()),
            goals: Repository::new(paths.goals_file()),
            history: Repository::new(paths.history_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Open the store and load everything from disk
    pub fn open(paths: FortnightPaths) -> BudgetResult<Self> {
        let store = Self::new(paths)?;
        store.load_all()?;
        Ok(store)
    }

    pub fn paths(&self) -> &FortnightPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> BudgetResult<()> {
        self.bills.load()?;
        self.debts.load()?;
        self.goals.load()?;
        self.history.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> BudgetResult<()> {
        self.bills.save()?;
        self.debts.save()?;
        self.goals.save()?;
        self.history.save()?;
        Ok(())
    }

    /// Check if the store has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// A consistent copy of every record
    pub fn contents(&self) -> BudgetResult<StoreContents> {
        Ok(StoreContents {
            bills: self.bills.get_all()?,
            debts: self.debts.get_all()?,
            goals: self.goals.get_all()?,
            history: self.history.get_all()?,
        })
    }

    /// Replace every collection at once, save, and audit the replacement
    ///
    /// `source` names where the records came from (e.g. "import", "refresh").
    pub fn replace_all(&self, contents: StoreContents, source: &str) -> BudgetResult<()> {
        let counts = [
            (EntityType::Bill, contents.bills.len(), self.bills.replace_all(contents.bills)?),
            (EntityType::Debt, contents.debts.len(), self.debts.replace_all(contents.debts)?),
            (EntityType::Goal, contents.goals.len(), self.goals.replace_all(contents.goals)?),
            (
                EntityType::Snapshot,
                contents.history.len(),
                self.history.replace_all(contents.history)?,
            ),
        ];
        self.save_all()?;

        let entries: Vec<AuditEntry> = counts
            .into_iter()
            .map(|(entity, after, before)| AuditEntry::replace(entity, source, before, after))
            .collect();
        self.audit.log_batch(&entries)
    }

    pub fn log_create<T: Record>(&self, record: &T) -> BudgetResult<()> {
        self.audit.log(&AuditEntry::create(
            T::ENTITY,
            record.record_id(),
            record.display_name(),
            record,
        ))
    }

    pub fn log_update<T: Record>(&self, before: &T, after: &T) -> BudgetResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&without_timestamps(b), &without_timestamps(a)),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            T::ENTITY,
            after.record_id(),
            after.display_name(),
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Record>(&self, record: &T) -> BudgetResult<()> {
        self.audit.log(&AuditEntry::delete(
            T::ENTITY,
            record.record_id(),
            record.display_name(),
            record,
        ))
    }
}

/// `updated_at` changes on every edit and would drown out the real diff
fn without_timestamps(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.remove("updated_at");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Frequency, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, BudgetStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FortnightPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = BudgetStore::new(paths).unwrap();
        (temp_dir, store)
    }

    fn rent() -> Bill {
        Bill::new(
            "Rent",
            Money::from_cents(120000),
            Frequency::Fortnightly,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_store_creation() {
        let (temp_dir, store) = create_test_store();
        assert!(temp_dir.path().join("data").exists());
        assert!(!store.is_initialized());
    }

    #[test]
    fn test_save_and_reopen() {
        let (temp_dir, store) = create_test_store();
        store.bills.upsert(rent()).unwrap();
        store.debts.upsert(Debt::new("Card", Money::from_cents(5000))).unwrap();
        store.save_all().unwrap();

        let reopened =
            BudgetStore::open(FortnightPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let contents = reopened.contents().unwrap();
        assert_eq!(contents.bills.len(), 1);
        assert_eq!(contents.debts.len(), 1);
        assert!(contents.history.is_empty());
    }

    #[test]
    fn test_audit_hooks() {
        let (_temp, store) = create_test_store();
        let before = rent();
        let mut after = before.clone();
        after.set_amount(Money::from_cents(125000));

        store.log_create(&before).unwrap();
        store.log_update(&before, &after).unwrap();
        store.log_delete(&after).unwrap();

        let entries = store.audit().read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("amount: 120000 -> 125000")
        );
        assert_eq!(entries[2].entity_name.as_deref(), Some("Rent"));
    }

    #[test]
    fn test_replace_all() {
        let (_temp, store) = create_test_store();
        store.bills.upsert(rent()).unwrap();

        let contents = StoreContents {
            goals: vec![Goal::new("Car", Money::from_cents(500000), None)],
            ..Default::default()
        };
        store.replace_all(contents, "import").unwrap();

        assert_eq!(store.bills.count().unwrap(), 0);
        assert_eq!(store.goals.count().unwrap(), 1);
        let entries = store.audit().read_all().unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.operation == Operation::Replace));
    }
}
