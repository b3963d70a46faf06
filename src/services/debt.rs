//! Debt service

use rust_decimal::Decimal;

use crate::engine;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Debt, Money, Priority};
use crate::storage::BudgetStore;

/// Fields to change on an existing debt
///
/// Changing the amount owed does not move the progress baseline.
#[derive(Debug, Clone, Default)]
pub struct DebtChanges {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub min_payment: Option<Money>,
    pub interest: Option<Decimal>,
    pub priority: Option<Priority>,
}

pub struct DebtService<'a> {
    store: &'a BudgetStore,
}

impl<'a> DebtService<'a> {
    pub fn new(store: &'a BudgetStore) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        name: &str,
        amount: Money,
        min_payment: Money,
        interest: Decimal,
        priority: Priority,
    ) -> BudgetResult<Debt> {
        let mut debt = Debt::new(name.trim(), amount);
        debt.min_payment = min_payment;
        debt.interest = interest;
        debt.priority = priority;
        debt.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.store.debts.upsert(debt.clone())?;
        self.store.debts.save()?;
        self.store.log_create(&debt)?;

        Ok(debt)
    }

    pub fn find(&self, identifier: &str) -> BudgetResult<Debt> {
        self.store.debts.find(identifier)
    }

    pub fn list(&self) -> BudgetResult<Vec<Debt>> {
        self.store.debts.get_all()
    }

    pub fn update(&self, identifier: &str, changes: DebtChanges) -> BudgetResult<Debt> {
        let mut debt = self.find(identifier)?;
        let before = debt.clone();

        if let Some(name) = changes.name {
            debt.name = name.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            debt.amount = amount;
        }
        if let Some(min_payment) = changes.min_payment {
            debt.min_payment = min_payment;
        }
        if let Some(interest) = changes.interest {
            debt.interest = interest;
        }
        if let Some(priority) = changes.priority {
            debt.priority = priority;
        }
        debt.updated_at = chrono::Utc::now();

        debt.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.save_changed(&before, &debt)?;
        Ok(debt)
    }

    /// Record a payment against a debt
    pub fn pay(&self, identifier: &str, payment: Money) -> BudgetResult<Debt> {
        let mut debt = self.find(identifier)?;
        let before = debt.clone();

        debt.apply_payment(payment)
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.save_changed(&before, &debt)?;
        Ok(debt)
    }

    pub fn delete(&self, identifier: &str) -> BudgetResult<Debt> {
        let debt = self.find(identifier)?;

        self.store.debts.delete(debt.id.as_str())?;
        self.store.debts.save()?;
        self.store.log_delete(&debt)?;

        Ok(debt)
    }

    /// Sum still owed across all debts
    pub fn total(&self) -> BudgetResult<Money> {
        Ok(engine::total_debt(&self.list()?))
    }

    fn save_changed(&self, before: &Debt, after: &Debt) -> BudgetResult<()> {
        self.store.debts.upsert(after.clone())?;
        self.store.debts.save()?;
        self.store.log_update(before, after)
    }
}
