//! Dashboard service

use crate::config::settings::BudgetDefaults;
use crate::engine::{self, DashboardSummary};
use crate::error::BudgetResult;
use crate::storage::BudgetStore;

use super::history::HistoryService;

pub struct DashboardService<'a> {
    store: &'a BudgetStore,
}

impl<'a> DashboardService<'a> {
    pub fn new(store: &'a BudgetStore) -> Self {
        Self { store }
    }

    /// Summary for the pay cycle and incomes last used in a calculation
    pub fn summary(&self, last_inputs: &BudgetDefaults) -> BudgetResult<DashboardSummary> {
        let contents = self.store.contents()?;
        let latest = HistoryService::new(self.store).latest()?;
        let window = last_inputs.pay_cycle();

        Ok(engine::summarize(
            &contents.bills,
            &contents.debts,
            &contents.goals,
            latest.as_ref(),
            last_inputs.total_income(),
            window.as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FortnightPaths;
    use crate::models::{Bill, Debt, Frequency, Goal, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_summary_from_store() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FortnightPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = BudgetStore::new(paths).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        store
            .bills
            .upsert(Bill::new("Rent", Money::from_cents(100000), Frequency::Weekly, start))
            .unwrap();
        store
            .debts
            .upsert(Debt::new("Card", Money::from_cents(30000)))
            .unwrap();
        let mut goal = Goal::new("Car", Money::from_cents(1000), None);
        goal.saved_amount = Money::from_cents(500);
        store.goals.upsert(goal).unwrap();

        let inputs = BudgetDefaults {
            income1: Money::from_cents(200000),
            income2: Money::from_cents(10000),
            pay_cycle_start: NaiveDate::from_ymd_opt(2024, 1, 15),
            ..Default::default()
        };
        let summary = DashboardService::new(&store).summary(&inputs).unwrap();

        assert_eq!(summary.total_income.cents(), 210000);
        assert!(summary.remaining.is_zero());
        assert_eq!(summary.next_bills, vec!["Rent"]);
        assert_eq!(summary.total_debt.cents(), 30000);
        assert_eq!(summary.average_goal_pct, 50);
    }
}
