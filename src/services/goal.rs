//! Savings goal service

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::engine;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Goal, Money, Priority};
use crate::storage::BudgetStore;

#[derive(Debug, Clone, Default)]
pub struct GoalChanges {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

pub struct GoalService<'a> {
    store: &'a BudgetStore,
}

impl<'a> GoalService<'a> {
    pub fn new(store: &'a BudgetStore) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        name: &str,
        target_amount: Money,
        deadline: Option<NaiveDate>,
        priority: Priority,
    ) -> BudgetResult<Goal> {
        let mut goal = Goal::new(name.trim(), target_amount, deadline);
        goal.priority = priority;
        goal.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.store.goals.upsert(goal.clone())?;
        self.store.goals.save()?;
        self.store.log_create(&goal)?;

        Ok(goal)
    }

    pub fn find(&self, identifier: &str) -> BudgetResult<Goal> {
        self.store.goals.find(identifier)
    }

    pub fn list(&self) -> BudgetResult<Vec<Goal>> {
        self.store.goals.get_all()
    }

    pub fn update(&self, identifier: &str, changes: GoalChanges) -> BudgetResult<Goal> {
        let mut goal = self.find(identifier)?;
        let before = goal.clone();

        if let Some(name) = changes.name {
            goal.name = name.trim().to_string();
        }
        if let Some(target) = changes.target_amount {
            goal.target_amount = target;
            if goal.saved_amount > target {
                goal.saved_amount = target;
            }
        }
        if changes.deadline.is_some() {
            goal.deadline = changes.deadline;
        }
        if let Some(priority) = changes.priority {
            goal.priority = priority;
        }
        goal.updated_at = Utc::now();

        goal.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.save_changed(&before, &goal)?;
        Ok(goal)
    }

    /// Add savings to a goal, never past its target
    pub fn deposit(&self, identifier: &str, amount: Money) -> BudgetResult<Goal> {
        let mut goal = self.find(identifier)?;
        let before = goal.clone();

        goal.deposit(amount)
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.save_changed(&before, &goal)?;
        Ok(goal)
    }

    pub fn delete(&self, identifier: &str) -> BudgetResult<Goal> {
        let goal = self.find(identifier)?;

        self.store.goals.delete(goal.id.as_str())?;
        self.store.goals.save()?;
        self.store.log_delete(&goal)?;

        Ok(goal)
    }

    /// Mean completion across all goals, in percent
    pub fn average_completion(&self) -> BudgetResult<Decimal> {
        Ok(engine::average_goal_completion(&self.list()?))
    }

    fn save_changed(&self, before: &Goal, after: &Goal) -> BudgetResult<()> {
        self.store.goals.upsert(after.clone())?;
        self.store.goals.save()?;
        self.store.log_update(before, after)
    }
}
