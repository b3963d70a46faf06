//! Savings goal model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;
use super::priority::Priority;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    #[serde(default)]
    pub saved_amount: Money,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(name: impl Into<String>, target_amount: Money, deadline: Option<NaiveDate>) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            name: name.into(),
            target_amount,
            saved_amount: Money::zero(),
            deadline,
            priority: Priority::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add money to the goal; savings stop at the target
    pub fn deposit(&mut self, amount: Money) -> Result<(), GoalValidationError> {
        if !amount.is_positive() {
            return Err(GoalValidationError::NonPositiveDeposit);
        }
        self.saved_amount += amount;
        if self.saved_amount > self.target_amount {
            self.saved_amount = self.target_amount;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Saved / target as an exact ratio; zero when there is no target
    pub fn completion(&self) -> Decimal {
        if self.target_amount.is_zero() {
            return Decimal::ZERO;
        }
        self.saved_amount.to_decimal() / self.target_amount.to_decimal()
    }

    pub fn remaining(&self) -> Money {
        let left = self.target_amount - self.saved_amount;
        if left.is_negative() {
            Money::zero()
        } else {
            left
        }
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget);
        }
        if self.saved_amount.is_negative() {
            return Err(GoalValidationError::NegativeSaved);
        }
        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} / {})", self.name, self.saved_amount, self.target_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget,
    NegativeSaved,
    NonPositiveDeposit,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Goal target must be greater than zero"),
            Self::NegativeSaved => write!(f, "Saved amount cannot be negative"),
            Self::NonPositiveDeposit => write!(f, "Deposit must be a positive amount"),
        }
    }
}

impl std::error::Error for GoalValidationError {}
