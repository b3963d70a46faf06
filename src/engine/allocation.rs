//! Budget allocation
//!
//! Splits what is left of a pay cycle's income, after the splurge amount and
//! the bills due, into the Fire and Smile percentage buckets. Mojo takes the
//! remainder so the three buckets always add up to the remaining amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::recurrence::is_due_in_window;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Bill, Money, PayCycleWindow};

/// Inputs of one allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationInput {
    pub income1: Money,
    pub income2: Money,
    pub splurge: Money,
    pub bills_due: Money,
    pub fire_pct: Decimal,
    pub smile_pct: Decimal,
}

/// Result of one allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub total_income: Money,
    pub bills_due: Money,
    /// May be negative when bills and splurge exceed income
    pub remaining: Money,
    pub fire: Money,
    pub smile: Money,
    pub mojo: Money,
}

/// Which bills count toward the bills-due figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillSelection {
    /// Every bill, regardless of when it falls due
    All,
    /// Only bills with an occurrence in the pay-cycle window
    #[default]
    DueInWindow,
}

impl BillSelection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "all" => Some(Self::All),
            "due" | "dueinwindow" | "window" => Some(Self::DueInWindow),
            _ => None,
        }
    }
}

impl fmt::Display for BillSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::DueInWindow => write!(f, "due"),
        }
    }
}

/// Sum of the amounts of the selected bills
///
/// `All` ignores the window; `DueInWindow` with no window selects nothing.
pub fn bills_due_amount(
    bills: &[Bill],
    selection: BillSelection,
    window: Option<&PayCycleWindow>,
) -> BudgetResult<Money> {
    bills
        .iter()
        .filter(|b| selection == BillSelection::All || is_due_in_window(b, window))
        .try_fold(Money::zero(), |total, b| total.checked_add(b.amount))
        .ok_or_else(|| BudgetError::AmountOutOfRange("total of bills due".into()))
}

/// Partition the remaining income into Fire, Smile and Mojo
///
/// Fails with [`BudgetError::InvalidAllocationInput`] when either percentage
/// is negative or the two together exceed 100, and with
/// [`BudgetError::AmountOutOfRange`] when the totals do not fit in cents.
pub fn allocate(input: &AllocationInput) -> BudgetResult<Allocation> {
    let invalid = || BudgetError::InvalidAllocationInput {
        fire_pct: input.fire_pct,
        smile_pct: input.smile_pct,
    };

    if input.fire_pct < Decimal::ZERO || input.smile_pct < Decimal::ZERO {
        return Err(invalid());
    }
    let pct_total = input
        .fire_pct
        .checked_add(input.smile_pct)
        .ok_or_else(invalid)?;
    if pct_total > Decimal::ONE_HUNDRED {
        return Err(invalid());
    }

    let total_income = input
        .income1
        .checked_add(input.income2)
        .ok_or_else(|| BudgetError::AmountOutOfRange("total income".into()))?;
    let remaining = total_income
        .checked_sub(input.splurge)
        .and_then(|m| m.checked_sub(input.bills_due))
        .ok_or_else(|| BudgetError::AmountOutOfRange("remaining income".into()))?;
    let fire = remaining.percent_of(input.fire_pct).ok_or_else(invalid)?;
    let smile = remaining.percent_of(input.smile_pct).ok_or_else(invalid)?;
    let mojo = remaining
        .checked_sub(fire)
        .and_then(|m| m.checked_sub(smile))
        .ok_or_else(|| BudgetError::AmountOutOfRange("mojo bucket".into()))?;

    Ok(Allocation {
        total_income,
        bills_due: input.bills_due,
        remaining,
        fire,
        smile,
        mojo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn input(
        income1: i64,
        income2: i64,
        splurge: i64,
        bills_due: i64,
        fire_pct: Decimal,
        smile_pct: Decimal,
    ) -> AllocationInput {
        AllocationInput {
            income1: Money::from_cents(income1),
            income2: Money::from_cents(income2),
            splurge: Money::from_cents(splurge),
            bills_due: Money::from_cents(bills_due),
            fire_pct,
            smile_pct,
        }
    }

    #[test]
    fn test_basic_allocation() {
        let result = allocate(&input(100000, 0, 10000, 20000, dec!(30), dec!(20))).unwrap();
        assert_eq!(result.total_income.cents(), 100000);
        assert_eq!(result.remaining.cents(), 70000);
        assert_eq!(result.fire.cents(), 21000);
        assert_eq!(result.smile.cents(), 14000);
        assert_eq!(result.mojo.cents(), 35000);
    }

    #[test]
    fn test_bills_exceeding_income_go_negative() {
        let result = allocate(&input(50000, 0, 0, 80000, dec!(50), dec!(25))).unwrap();
        assert_eq!(result.remaining.cents(), -30000);
        assert_eq!(result.fire.cents(), -15000);
        assert_eq!(result.smile.cents(), -7500);
        assert_eq!(result.mojo.cents(), -7500);
    }

    #[test]
    fn test_percentages_over_hundred_rejected() {
        let err = allocate(&input(100000, 0, 0, 0, dec!(30), dec!(70.0001))).unwrap_err();
        assert!(err.is_invalid_allocation());

        let err = allocate(&input(100000, 0, 0, 0, dec!(100.0001), dec!(0))).unwrap_err();
        assert!(err.is_invalid_allocation());
    }

    #[test]
    fn test_exactly_hundred_leaves_no_mojo() {
        let result = allocate(&input(100000, 0, 0, 0, dec!(60), dec!(40))).unwrap();
        assert_eq!(result.fire.cents(), 60000);
        assert_eq!(result.smile.cents(), 40000);
        assert!(result.mojo.is_zero());
    }

    #[test]
    fn test_negative_percentage_rejected() {
        let err = allocate(&input(100000, 0, 0, 0, dec!(-10), dec!(20))).unwrap_err();
        assert!(err.is_invalid_allocation());
    }

    #[test]
    fn test_buckets_always_sum_to_remaining() {
        let pcts = [
            (dec!(0), dec!(0)),
            (dec!(33.3333), dec!(33.3333)),
            (dec!(12.5), dec!(87.5)),
            (dec!(7), dec!(19)),
            (dec!(100), dec!(0)),
        ];
        let incomes = [0, 1, 99, 100001, 333333, -5];
        for (fire_pct, smile_pct) in pcts {
            for income in incomes {
                let result =
                    allocate(&input(income, 1234, 777, 2500, fire_pct, smile_pct)).unwrap();
                assert_eq!(result.fire + result.smile + result.mojo, result.remaining);
                assert_eq!(
                    result.remaining,
                    result.total_income - Money::from_cents(777) - Money::from_cents(2500)
                );
            }
        }
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 1.01 * 50% = 0.505
        let result = allocate(&input(101, 0, 0, 0, dec!(50), dec!(0))).unwrap();
        assert_eq!(result.fire.cents(), 51);
        assert_eq!(result.mojo.cents(), 50);

        let result = allocate(&input(0, 0, 101, 0, dec!(50), dec!(0))).unwrap();
        assert_eq!(result.fire.cents(), -51);
        assert_eq!(result.mojo.cents(), -50);
    }

    #[test]
    fn test_bills_due_amount_selection() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bills = vec![
            Bill::new("Rent", Money::from_cents(120000), Frequency::Fortnightly, start),
            Bill::new(
                "Rates",
                Money::from_cents(40000),
                Frequency::Annually,
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ),
        ];
        let window = PayCycleWindow::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        assert_eq!(
            bills_due_amount(&bills, BillSelection::All, Some(&window)).unwrap().cents(),
            160000
        );
        assert_eq!(
            bills_due_amount(&bills, BillSelection::DueInWindow, Some(&window))
                .unwrap()
                .cents(),
            120000
        );
        assert!(bills_due_amount(&bills, BillSelection::DueInWindow, None)
            .unwrap()
            .is_zero());
        assert_eq!(
            bills_due_amount(&bills, BillSelection::All, None).unwrap().cents(),
            160000
        );
    }

    #[test]
    fn test_overflowing_totals_are_errors() {
        let huge = i64::MAX - 10;
        let err = allocate(&input(huge, huge, 0, 0, dec!(10), dec!(10))).unwrap_err();
        assert!(matches!(err, BudgetError::AmountOutOfRange(_)));

        let err = allocate(&input(-huge, 0, huge, 0, dec!(10), dec!(10))).unwrap_err();
        assert!(matches!(err, BudgetError::AmountOutOfRange(_)));

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bills = vec![
            Bill::new("A", Money::from_cents(huge), Frequency::Weekly, start),
            Bill::new("B", Money::from_cents(huge), Frequency::Weekly, start),
        ];
        let err = bills_due_amount(&bills, BillSelection::All, None).unwrap_err();
        assert!(matches!(err, BudgetError::AmountOutOfRange(_)));
    }

    #[test]
    fn test_bill_selection_parse() {
        assert_eq!(BillSelection::parse("all"), Some(BillSelection::All));
        assert_eq!(BillSelection::parse("Due"), Some(BillSelection::DueInWindow));
        assert_eq!(BillSelection::parse("due-in-window"), Some(BillSelection::DueInWindow));
        assert_eq!(BillSelection::parse("some"), None);
    }
}
