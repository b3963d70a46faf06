//! Debt model
//!
//! A balance owed that shrinks toward zero as payments are made.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::DebtId;
use super::money::Money;
use super::priority::Priority;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,
    pub name: String,
    /// Amount still owed
    pub amount: Money,
    #[serde(default)]
    pub min_payment: Money,
    /// Annual interest rate in percent
    #[serde(default)]
    pub interest: Decimal,
    #[serde(default)]
    pub priority: Priority,
    /// Amount owed when the debt was first recorded, the baseline for progress
    pub initial_amount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: DebtId::new(),
            name: name.into(),
            amount,
            min_payment: Money::zero(),
            interest: Decimal::ZERO,
            priority: Priority::default(),
            initial_amount: amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a payment; the balance never goes below zero
    pub fn apply_payment(&mut self, payment: Money) -> Result<(), DebtValidationError> {
        if !payment.is_positive() {
            return Err(DebtValidationError::NonPositivePayment);
        }
        self.amount = if payment > self.amount {
            Money::zero()
        } else {
            self.amount - payment
        };
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Share of the initial balance already paid off, in whole percent (0-100)
    pub fn progress_pct(&self) -> u32 {
        if !self.initial_amount.is_positive() {
            return 0;
        }
        let paid = (self.initial_amount - self.amount).to_decimal();
        let pct = (paid / self.initial_amount.to_decimal() * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        pct.to_u32().unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), DebtValidationError> {
        if self.name.trim().is_empty() {
            return Err(DebtValidationError::EmptyName);
        }
        if self.amount.is_negative() {
            return Err(DebtValidationError::NegativeAmount);
        }
        if self.min_payment.is_negative() {
            return Err(DebtValidationError::NegativeMinPayment);
        }
        if self.interest < Decimal::ZERO {
            return Err(DebtValidationError::NegativeInterest);
        }
        Ok(())
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} owed)", self.name, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebtValidationError {
    EmptyName,
    NegativeAmount,
    NegativeMinPayment,
    NegativeInterest,
    NonPositivePayment,
}

impl fmt::Display for DebtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Debt name cannot be empty"),
            Self::NegativeAmount => write!(f, "Amount owed cannot be negative"),
            Self::NegativeMinPayment => write!(f, "Minimum payment cannot be negative"),
            Self::NegativeInterest => write!(f, "Interest rate cannot be negative"),
            Self::NonPositivePayment => write!(f, "Payment must be a positive amount"),
        }
    }
}

impl std::error::Error for DebtValidationError {}
