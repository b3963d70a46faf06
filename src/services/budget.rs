//! Budget calculation service
//!
//! Gathers the bills for a pay cycle, runs the allocator and, on request,
//! freezes the result into a history snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::{self, Allocation, AllocationInput, BillSelection};
use crate::error::BudgetResult;
use crate::models::{BudgetSnapshot, Money, PayCycleWindow};
use crate::storage::BudgetStore;

/// What the user entered for one calculation
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub income1: Money,
    pub income2: Money,
    pub splurge: Money,
    pub fire_pct: Decimal,
    pub smile_pct: Decimal,
    pub selection: BillSelection,
    pub window: Option<PayCycleWindow>,
}

/// A bill counted toward the bills-due figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountedBill {
    pub name: String,
    pub amount: Money,
    /// Occurrence inside the window; `None` when every bill is counted
    pub due_date: Option<NaiveDate>,
}

/// A completed calculation, not yet saved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub input: AllocationInput,
    pub allocation: Allocation,
    pub selection: BillSelection,
    pub pay_cycle_start: Option<NaiveDate>,
    pub bills: Vec<CountedBill>,
}

pub struct BudgetService<'a> {
    store: &'a BudgetStore,
}

impl<'a> BudgetService<'a> {
    pub fn new(store: &'a BudgetStore) -> Self {
        Self { store }
    }

    /// Run the allocator over the current bills
    ///
    /// Fails with `InvalidAllocationInput` before anything is computed when
    /// the percentages cannot be allocated.
    pub fn calculate(&self, request: &CalculationRequest) -> BudgetResult<Calculation> {
        let all_bills = self.store.bills.get_all()?;
        let window = request.window.as_ref();

        let bills: Vec<CountedBill> = match request.selection {
            BillSelection::All => all_bills
                .iter()
                .map(|b| CountedBill {
                    name: b.name.clone(),
                    amount: b.amount,
                    due_date: None,
                })
                .collect(),
            BillSelection::DueInWindow => engine::due_bills(&all_bills, window)
                .into_iter()
                .map(|d| CountedBill {
                    name: d.bill.name.clone(),
                    amount: d.bill.amount,
                    due_date: Some(d.due_date),
                })
                .collect(),
        };

        let input = AllocationInput {
            income1: request.income1,
            income2: request.income2,
            splurge: request.splurge,
            bills_due: engine::bills_due_amount(&all_bills, request.selection, window)?,
            fire_pct: request.fire_pct,
            smile_pct: request.smile_pct,
        };
        let allocation = engine::allocate(&input)?;

        Ok(Calculation {
            input,
            allocation,
            selection: request.selection,
            pay_cycle_start: request.window.map(|w| w.start_date()),
            bills,
        })
    }

    /// Append a calculation to the history
    pub fn save_snapshot(&self, calculation: &Calculation) -> BudgetResult<BudgetSnapshot> {
        self.save_snapshot_at(calculation, Utc::now())
    }

    pub fn save_snapshot_at(
        &self,
        calculation: &Calculation,
        timestamp: DateTime<Utc>,
    ) -> BudgetResult<BudgetSnapshot> {
        let snapshot = BudgetSnapshot::record(
            &calculation.input,
            &calculation.allocation,
            calculation.pay_cycle_start,
            timestamp,
        );

        self.store.history.upsert(snapshot.clone())?;
        self.store.history.save()?;
        self.store.log_create(&snapshot)?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FortnightPaths;
    use crate::models::{Bill, Frequency};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_store() -> (TempDir, BudgetStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FortnightPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = BudgetStore::new(paths).unwrap();
        for bill in [
            Bill::new("Phone", Money::from_cents(5000), Frequency::Monthly, date(2024, 1, 20)),
            Bill::new("Rent", Money::from_cents(15000), Frequency::Fortnightly, date(2024, 1, 1)),
            Bill::new("Rates", Money::from_cents(90000), Frequency::Annually, date(2024, 9, 1)),
        ] {
            store.bills.upsert(bill).unwrap();
        }
        (temp_dir, store)
    }

    fn request(selection: BillSelection) -> CalculationRequest {
        CalculationRequest {
            income1: Money::from_cents(100000),
            income2: Money::zero(),
            splurge: Money::from_cents(10000),
            fire_pct: dec!(30),
            smile_pct: dec!(20),
            selection,
            window: Some(PayCycleWindow::new(date(2024, 1, 15))),
        }
    }

    #[test]
    fn test_calculate_due_in_window() {
        let (_temp, store) = create_test_store();
        let service = BudgetService::new(&store);

        let calc = service.calculate(&request(BillSelection::DueInWindow)).unwrap();

        assert_eq!(calc.input.bills_due.cents(), 20000);
        assert_eq!(calc.allocation.remaining.cents(), 70000);
        assert_eq!(calc.allocation.fire.cents(), 21000);
        assert_eq!(calc.allocation.smile.cents(), 14000);
        assert_eq!(calc.allocation.mojo.cents(), 35000);
        let names: Vec<&str> = calc.bills.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Phone"]);
        assert_eq!(calc.pay_cycle_start, Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_calculate_all_bills() {
        let (_temp, store) = create_test_store();
        let service = BudgetService::new(&store);

        let calc = service.calculate(&request(BillSelection::All)).unwrap();
        assert_eq!(calc.input.bills_due.cents(), 110000);
        assert_eq!(calc.allocation.remaining.cents(), -20000);
        assert_eq!(calc.bills.len(), 3);
        assert!(calc.bills.iter().all(|b| b.due_date.is_none()));
    }

    #[test]
    fn test_calculate_rejects_percentages_and_saves_nothing() {
        let (_temp, store) = create_test_store();
        let service = BudgetService::new(&store);
        let mut req = request(BillSelection::DueInWindow);
        req.smile_pct = dec!(70.0001);

        assert!(service.calculate(&req).unwrap_err().is_invalid_allocation());
        assert_eq!(store.history.count().unwrap(), 0);
    }

    #[test]
    fn test_save_snapshot() {
        let (_temp, store) = create_test_store();
        let service = BudgetService::new(&store);
        let calc = service.calculate(&request(BillSelection::DueInWindow)).unwrap();

        let snapshot = service.save_snapshot(&calc).unwrap();

        assert!(snapshot.is_balanced());
        assert_eq!(snapshot.pay_cycle_start, Some(date(2024, 1, 15)));
        assert_eq!(store.history.get_all().unwrap(), vec![snapshot]);
    }
}
