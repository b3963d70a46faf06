//! Bill service
//!
//! CRUD for bills plus the due-bill queries the budget screen needs.

use chrono::NaiveDate;

use crate::engine::{self, BillSelection};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Bill, Frequency, Money, PayCycleWindow};
use crate::storage::BudgetStore;

/// Fields to change on an existing bill; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct BillChanges {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
}

impl BillChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.frequency.is_none()
            && self.start_date.is_none()
    }
}

/// Service for bill management
pub struct BillService<'a> {
    store: &'a BudgetStore,
}

impl<'a> BillService<'a> {
    pub fn new(store: &'a BudgetStore) -> Self {
        Self { store }
    }

    /// Create a new bill
    pub fn create(
        &self,
        name: &str,
        amount: Money,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> BudgetResult<Bill> {
        let bill = Bill::new(name.trim(), amount, frequency, start_date);
        bill.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.store.bills.upsert(bill.clone())?;
        self.store.bills.save()?;
        self.store.log_create(&bill)?;

        Ok(bill)
    }

    /// Find a bill by id, short id or name
    pub fn find(&self, identifier: &str) -> BudgetResult<Bill> {
        self.store.bills.find(identifier)
    }

    /// All bills in the order they were added
    pub fn list(&self) -> BudgetResult<Vec<Bill>> {
        self.store.bills.get_all()
    }

    pub fn update(&self, identifier: &str, changes: BillChanges) -> BudgetResult<Bill> {
        let mut bill = self.find(identifier)?;
        let before = bill.clone();

        if let Some(name) = changes.name {
            bill.set_name(name.trim());
        }
        if let Some(amount) = changes.amount {
            bill.set_amount(amount);
        }
        if let Some(frequency) = changes.frequency {
            bill.set_frequency(frequency);
        }
        if let Some(start_date) = changes.start_date {
            bill.set_start_date(start_date);
        }

        bill.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.store.bills.upsert(bill.clone())?;
        self.store.bills.save()?;
        self.store.log_update(&before, &bill)?;

        Ok(bill)
    }

    pub fn delete(&self, identifier: &str) -> BudgetResult<Bill> {
        let bill = self.find(identifier)?;

        self.store.bills.delete(bill.id.as_str())?;
        self.store.bills.save()?;
        self.store.log_delete(&bill)?;

        Ok(bill)
    }

    /// Total of the bills counted toward a budget calculation
    pub fn total_due(
        &self,
        selection: BillSelection,
        window: Option<&PayCycleWindow>,
    ) -> BudgetResult<Money> {
        let bills = self.list()?;
        engine::bills_due_amount(&bills, selection, window)
    }
}
