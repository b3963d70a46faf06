//! Sync service
//!
//! Mirrors local changes to a [`RowStore`] and pulls the remote tables back
//! into the local store. Pushes are best effort: a failed push is logged and
//! the local change stands. A refresh either replaces every local collection
//! or leaves the store untouched.

use log::{debug, info, warn};

use super::records::{
    bill_from_row, bill_to_row, debt_from_row, debt_to_row, goal_from_row, goal_to_row, row_id,
    snapshot_from_row, snapshot_to_row, Row,
};
use super::row_store::{RowStore, Table};
use crate::error::BudgetResult;
use crate::models::{Bill, BillId, BudgetSnapshot, Debt, DebtId, Goal, GoalId, SnapshotId};
use crate::storage::{BudgetStore, Record, Repository, StoreContents};

/// A record type that has a remote table
pub trait Syncable: Record {
    const TABLE: Table;

    fn to_row(&self) -> Row;

    fn from_row(row: &Row) -> BudgetResult<Self>;

    /// Copy of the record under the id the remote store assigned
    fn with_remote_id(&self, id: String) -> Self;

    fn repository(store: &BudgetStore) -> &Repository<Self>;
}

impl Syncable for Bill {
    const TABLE: Table = Table::Bills;

    fn to_row(&self) -> Row {
        bill_to_row(self)
    }

    fn from_row(row: &Row) -> BudgetResult<Self> {
        bill_from_row(row)
    }

    fn with_remote_id(&self, id: String) -> Self {
        Self {
            id: BillId::from_raw(id),
            ..self.clone()
        }
    }

    fn repository(store: &BudgetStore) -> &Repository<Self> {
        &store.bills
    }
}

impl Syncable for Debt {
    const TABLE: Table = Table::Debts;

    fn to_row(&self) -> Row {
        debt_to_row(self)
    }

    fn from_row(row: &Row) -> BudgetResult<Self> {
        debt_from_row(row)
    }

    fn with_remote_id(&self, id: String) -> Self {
        Self {
            id: DebtId::from_raw(id),
            ..self.clone()
        }
    }

    fn repository(store: &BudgetStore) -> &Repository<Self> {
        &store.debts
    }
}

impl Syncable for Goal {
    const TABLE: Table = Table::Goals;

    fn to_row(&self) -> Row {
        goal_to_row(self)
    }

    fn from_row(row: &Row) -> BudgetResult<Self> {
        goal_from_row(row)
    }

    fn with_remote_id(&self, id: String) -> Self {
        Self {
            id: GoalId::from_raw(id),
            ..self.clone()
        }
    }

    fn repository(store: &BudgetStore) -> &Repository<Self> {
        &store.goals
    }
}

impl Syncable for BudgetSnapshot {
    const TABLE: Table = Table::Snapshots;

    fn to_row(&self) -> Row {
        snapshot_to_row(self)
    }

    fn from_row(row: &Row) -> BudgetResult<Self> {
        snapshot_from_row(row)
    }

    fn with_remote_id(&self, id: String) -> Self {
        Self {
            id: SnapshotId::from_raw(id),
            ..self.clone()
        }
    }

    fn repository(store: &BudgetStore) -> &Repository<Self> {
        &store.history
    }
}

/// Outcome of pushing every local record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PushReport {
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Outcome of a refresh
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub bills: usize,
    pub debts: usize,
    pub goals: usize,
    pub history: usize,
    /// Rows that could not be normalized and were left out
    pub skipped: usize,
}

pub struct SyncService<'a> {
    store: &'a BudgetStore,
    remote: &'a dyn RowStore,
}

impl<'a> SyncService<'a> {
    pub fn new(store: &'a BudgetStore, remote: &'a dyn RowStore) -> Self {
        Self { store, remote }
    }

    /// Insert a freshly created record remotely and adopt the remote id
    ///
    /// Returns the record as it is now stored locally.
    pub fn push_created<T: Syncable>(&self, record: &T) -> BudgetResult<T> {
        match self.remote.insert(T::TABLE, record.to_row()) {
            Ok(row) => self.adopt_remote_id(record, &row),
            Err(e) => {
                warn!(
                    "Failed to push new {} '{}': {}",
                    T::TABLE,
                    record.record_id(),
                    e
                );
                Ok(record.clone())
            }
        }
    }

    /// Mirror an edit; failures are logged and otherwise ignored
    pub fn push_updated<T: Syncable>(&self, record: &T) {
        if let Err(e) = self
            .remote
            .update(T::TABLE, record.record_id(), record.to_row())
        {
            warn!(
                "Failed to push update of {} '{}': {}",
                T::TABLE,
                record.record_id(),
                e
            );
        }
    }

    /// Mirror a delete; failures are logged and otherwise ignored
    pub fn push_deleted<T: Syncable>(&self, record: &T) {
        match self.remote.delete(T::TABLE, record.record_id()) {
            Ok(0) => debug!("{} '{}' was not on the remote", T::TABLE, record.record_id()),
            Ok(_) => {}
            Err(e) => warn!(
                "Failed to push delete of {} '{}': {}",
                T::TABLE,
                record.record_id(),
                e
            ),
        }
    }

    /// Upload every local record, inserting those the remote does not have
    pub fn push_all(&self) -> BudgetResult<PushReport> {
        let mut report = PushReport::default();
        self.push_table::<Bill>(&mut report)?;
        self.push_table::<Debt>(&mut report)?;
        self.push_table::<Goal>(&mut report)?;
        self.push_table::<BudgetSnapshot>(&mut report)?;
        info!(
            "Pushed {} new and {} updated records ({} failed)",
            report.inserted, report.updated, report.failed
        );
        Ok(report)
    }

    fn push_table<T: Syncable>(&self, report: &mut PushReport) -> BudgetResult<()> {
        let remote_ids: Vec<String> = self
            .remote
            .select_all(T::TABLE)?
            .iter()
            .filter_map(row_id)
            .collect();

        for record in T::repository(self.store).get_all()? {
            if remote_ids.iter().any(|id| id == record.record_id()) {
                match self
                    .remote
                    .update(T::TABLE, record.record_id(), record.to_row())
                {
                    Ok(()) => report.updated += 1,
                    Err(e) => {
                        warn!("Failed to push {} '{}': {}", T::TABLE, record.record_id(), e);
                        report.failed += 1;
                    }
                }
                continue;
            }

            match self.remote.insert(T::TABLE, record.to_row()) {
                Ok(row) => {
                    self.adopt_remote_id(&record, &row)?;
                    report.inserted += 1;
                }
                Err(e) => {
                    warn!("Failed to push {} '{}': {}", T::TABLE, record.record_id(), e);
                    report.failed += 1;
                }
            }
        }
        Ok(())
    }

    fn adopt_remote_id<T: Syncable>(&self, record: &T, row: &Row) -> BudgetResult<T> {
        let remote_id = match row_id(row) {
            Some(id) if id != record.record_id() => id,
            _ => return Ok(record.clone()),
        };

        let adopted = record.with_remote_id(remote_id);
        let repo = T::repository(self.store);
        if repo.replace(record.record_id(), adopted.clone())? {
            repo.save()?;
            self.store.log_update(record, &adopted)?;
        }
        Ok(adopted)
    }

    /// Replace every local collection with the remote tables
    ///
    /// All four tables are fetched before anything local changes, so a
    /// failed fetch leaves the store as it was.
    pub fn refresh(&self) -> BudgetResult<RefreshReport> {
        let mut skipped = 0;
        let bills: Vec<Bill> = self.fetch(&mut skipped)?;
        let debts: Vec<Debt> = self.fetch(&mut skipped)?;
        let goals: Vec<Goal> = self.fetch(&mut skipped)?;
        let mut history: Vec<BudgetSnapshot> = self.fetch(&mut skipped)?;
        history.sort_by_key(|s| s.timestamp);

        let report = RefreshReport {
            bills: bills.len(),
            debts: debts.len(),
            goals: goals.len(),
            history: history.len(),
            skipped,
        };
        self.store.replace_all(
            StoreContents {
                bills,
                debts,
                goals,
                history,
            },
            "refresh",
        )?;
        info!(
            "Refreshed {} bills, {} debts, {} goals, {} snapshots ({} rows skipped)",
            report.bills, report.debts, report.goals, report.history, report.skipped
        );
        Ok(report)
    }

    fn fetch<T: Syncable>(&self, skipped: &mut usize) -> BudgetResult<Vec<T>> {
        let rows = self.remote.select_all(T::TABLE)?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match T::from_row(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping {} row: {}", T::TABLE, e);
                    *skipped += 1;
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FortnightPaths;
    use crate::error::BudgetError;
    use crate::models::{Frequency, Money};
    use crate::sync::MemoryRowStore;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;

    struct UnreachableRowStore;

    impl RowStore for UnreachableRowStore {
        fn select_all(&self, _table: Table) -> BudgetResult<Vec<Row>> {
            Err(BudgetError::Sync("connection refused".into()))
        }

        fn insert(&self, _table: Table, _row: Row) -> BudgetResult<Row> {
            Err(BudgetError::Sync("connection refused".into()))
        }

        fn update(&self, _table: Table, _id: &str, _row: Row) -> BudgetResult<()> {
            Err(BudgetError::Sync("connection refused".into()))
        }

        fn delete(&self, _table: Table, _id: &str) -> BudgetResult<usize> {
            Err(BudgetError::Sync("connection refused".into()))
        }
    }

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

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_push_created_adopts_remote_id() {
        let (_temp, store) = create_test_store();
        let remote = MemoryRowStore::new();
        let bill = rent();
        store.bills.upsert(bill.clone()).unwrap();

        let pushed = SyncService::new(&store, &remote).push_created(&bill).unwrap();

        assert_eq!(pushed.id.as_str(), "1");
        assert_eq!(pushed.name, "Rent");
        assert_eq!(store.bills.get_all().unwrap(), vec![pushed]);
        assert_eq!(remote.select_all(Table::Bills).unwrap().len(), 1);
    }

    #[test]
    fn test_push_failures_keep_local_changes() {
        let (_temp, store) = create_test_store();
        let bill = rent();
        store.bills.upsert(bill.clone()).unwrap();

        let sync = SyncService::new(&store, &UnreachableRowStore);
        let pushed = sync.push_created(&bill).unwrap();
        sync.push_updated(&pushed);
        sync.push_deleted(&pushed);

        assert_eq!(pushed.id, bill.id);
        assert_eq!(store.bills.get_all().unwrap(), vec![bill]);
    }

    #[test]
    fn test_push_all_inserts_then_updates() {
        let (_temp, store) = create_test_store();
        let remote = MemoryRowStore::new();
        store.bills.upsert(rent()).unwrap();
        store
            .debts
            .upsert(Debt::new("Card", Money::from_cents(30000)))
            .unwrap();

        let sync = SyncService::new(&store, &remote);
        let first = sync.push_all().unwrap();
        assert_eq!(first.inserted, 2);
        assert_eq!(first.updated, 0);

        let second = sync.push_all().unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.updated, 2);
        assert_eq!(remote.select_all(Table::Bills).unwrap().len(), 1);
    }

    #[test]
    fn test_refresh_replaces_local_collections() {
        let (_temp, store) = create_test_store();
        store.bills.upsert(rent()).unwrap();

        let remote = MemoryRowStore::new();
        remote
            .insert(
                Table::Bills,
                row(json!({"name": "Gym", "amt": "15.50", "frequency": "Weekly", "startDate": "2024-01-03"})),
            )
            .unwrap();
        remote
            .insert(Table::Bills, row(json!({"name": "Broken"})))
            .unwrap();
        remote
            .insert(
                Table::Goals,
                row(json!({"name": "Car", "targetAmount": 5000, "savedAmount": 1250})),
            )
            .unwrap();
        remote
            .insert(
                Table::Snapshots,
                row(json!({"timestamp": "2024-02-01T10:00:00Z", "income1": 2000, "fire_pct": 10})),
            )
            .unwrap();
        remote
            .insert(
                Table::Snapshots,
                row(json!({"ts": "2024-01-01 09:00:00", "income1": 1000})),
            )
            .unwrap();

        let report = SyncService::new(&store, &remote).refresh().unwrap();

        assert_eq!(
            report,
            RefreshReport {
                bills: 1,
                debts: 0,
                goals: 1,
                history: 2,
                skipped: 1,
            }
        );
        let contents = store.contents().unwrap();
        assert_eq!(contents.bills[0].name, "Gym");
        assert_eq!(contents.bills[0].amount.cents(), 1550);
        assert_eq!(contents.goals[0].saved_amount.cents(), 125000);
        assert_eq!(contents.history[0].income1.cents(), 100000);
        assert_eq!(contents.history[1].fire_amt.cents(), 20000);
    }

    #[test]
    fn test_refresh_failure_leaves_store_untouched() {
        let (_temp, store) = create_test_store();
        store.bills.upsert(rent()).unwrap();

        let result = SyncService::new(&store, &UnreachableRowStore).refresh();

        assert!(matches!(result, Err(BudgetError::Sync(_))));
        assert_eq!(store.bills.count().unwrap(), 1);
    }
}
