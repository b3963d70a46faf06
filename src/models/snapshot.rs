//! Budget snapshot model
//!
//! An immutable record of one completed budget calculation, appended to the
//! history log when the user chooses to save it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SnapshotId;
use super::money::Money;
use crate::engine::allocation::{allocate, Allocation, AllocationInput};
use crate::error::{BudgetError, BudgetResult};

/// Parse a snapshot timestamp
///
/// Accepts RFC 3339 and the offset-less `YYYY-MM-DDTHH:MM:SS` form, which
/// is read as UTC.
pub fn parse_timestamp(raw: &str) -> BudgetResult<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.and_utc());
        }
    }
    Err(BudgetError::UnparseableDate(raw.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub id: SnapshotId,
    pub timestamp: DateTime<Utc>,
    /// Start of the pay cycle the bills were selected for, if any
    pub pay_cycle_start: Option<NaiveDate>,
    pub income1: Money,
    pub income2: Money,
    pub splurge: Money,
    pub bills_due: Money,
    pub fire_pct: Decimal,
    pub smile_pct: Decimal,
    pub fire_amt: Money,
    pub smile_amt: Money,
    pub mojo_amt: Money,
    pub remaining: Money,
    pub total_income: Money,
}

impl BudgetSnapshot {
    /// Freeze a calculation into a snapshot taken at `timestamp`
    pub fn record(
        input: &AllocationInput,
        allocation: &Allocation,
        pay_cycle_start: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SnapshotId::new(),
            timestamp,
            pay_cycle_start,
            income1: input.income1,
            income2: input.income2,
            splurge: input.splurge,
            bills_due: allocation.bills_due,
            fire_pct: input.fire_pct,
            smile_pct: input.smile_pct,
            fire_amt: allocation.fire,
            smile_amt: allocation.smile,
            mojo_amt: allocation.mojo,
            remaining: allocation.remaining,
            total_income: allocation.total_income,
        }
    }

    /// The inputs the snapshot was calculated from
    pub fn input(&self) -> AllocationInput {
        AllocationInput {
            income1: self.income1,
            income2: self.income2,
            splurge: self.splurge,
            bills_due: self.bills_due,
            fire_pct: self.fire_pct,
            smile_pct: self.smile_pct,
        }
    }

    /// Whether the stored buckets still add up to the remaining amount
    pub fn is_balanced(&self) -> bool {
        let buckets = self
            .fire_amt
            .checked_add(self.smile_amt)
            .and_then(|m| m.checked_add(self.mojo_amt));
        buckets == Some(self.remaining)
            && self.income1.checked_add(self.income2) == Some(self.total_income)
    }

    /// Check that the stored amounts are exactly what the inputs allocate to
    ///
    /// Fails with the allocation error when the percentages are invalid, and
    /// with a validation error when any stored amount differs.
    pub fn verify(&self) -> BudgetResult<()> {
        let expected = allocate(&self.input())?;
        let stored = Allocation {
            total_income: self.total_income,
            bills_due: self.bills_due,
            remaining: self.remaining,
            fire: self.fire_amt,
            smile: self.smile_amt,
            mojo: self.mojo_amt,
        };
        if stored != expected {
            return Err(BudgetError::Validation(format!(
                "amounts do not match the inputs (expected total income {}, remaining {}, \
                 fire {}, smile {}, mojo {})",
                expected.total_income,
                expected.remaining,
                expected.fire,
                expected.smile,
                expected.mojo
            )));
        }
        Ok(())
    }
}

impl fmt::Display for BudgetSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} income {} remaining {}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.total_income,
            self.remaining
        )
    }
}
