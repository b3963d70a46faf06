//! Snapshot history service
//!
//! Snapshots are never edited. They can only be listed, looked at and
//! deleted one at a time.

use crate::error::BudgetResult;
use crate::models::BudgetSnapshot;
use crate::storage::BudgetStore;

pub struct HistoryService<'a> {
    store: &'a BudgetStore,
}

impl<'a> HistoryService<'a> {
    pub fn new(store: &'a BudgetStore) -> Self {
        Self { store }
    }

    /// Snapshots, newest first
    pub fn list(&self) -> BudgetResult<Vec<BudgetSnapshot>> {
        let mut snapshots = self.store.history.get_all()?;
        // Stable, so equal timestamps stay newest-saved first after reversal
        snapshots.reverse();
        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(snapshots)
    }

    /// Most recent snapshot, if any
    pub fn latest(&self) -> BudgetResult<Option<BudgetSnapshot>> {
        Ok(self.list()?.into_iter().next())
    }

    pub fn find(&self, identifier: &str) -> BudgetResult<BudgetSnapshot> {
        self.store.history.find(identifier)
    }

    pub fn delete(&self, identifier: &str) -> BudgetResult<BudgetSnapshot> {
        let snapshot = self.find(identifier)?;

        self.store.history.delete(snapshot.id.as_str())?;
        self.store.history.save()?;
        self.store.log_delete(&snapshot)?;

        Ok(snapshot)
    }
}
