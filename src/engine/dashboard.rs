//! Dashboard aggregates

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::recurrence::due_bills;
use crate::models::{Bill, BudgetSnapshot, Debt, Goal, Money, PayCycleWindow};

/// How many due bill names the summary lists
pub const DUE_BILL_PREVIEW: usize = 3;

/// Sum of what is still owed across all debts
pub fn total_debt(debts: &[Debt]) -> Money {
    debts.iter().map(|d| d.amount).sum()
}

/// Mean goal completion as an exact percentage
///
/// A goal without a target counts as 0%; no goals at all is 0%.
pub fn average_goal_completion(goals: &[Goal]) -> Decimal {
    if goals.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = goals.iter().map(Goal::completion).sum();
    sum * Decimal::ONE_HUNDRED / Decimal::from(goals.len())
}

/// Round a percentage to a whole number for display
pub fn whole_percent(pct: Decimal) -> i64 {
    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_income: Money,
    /// Remaining amount of the latest saved snapshot
    pub remaining: Money,
    pub bills_due_count: usize,
    /// Names of the first few bills due, earliest first
    pub next_bills: Vec<String>,
    pub total_debt: Money,
    pub average_goal_completion: Decimal,
    pub average_goal_pct: i64,
}

/// Build the dashboard numbers from the current records
///
/// `latest` is the most recent snapshot, if any. `total_income` comes from
/// the last entered incomes.
pub fn summarize(
    bills: &[Bill],
    debts: &[Debt],
    goals: &[Goal],
    latest: Option<&BudgetSnapshot>,
    total_income: Money,
    window: Option<&PayCycleWindow>,
) -> DashboardSummary {
    let due = due_bills(bills, window);
    let average = average_goal_completion(goals);

    DashboardSummary {
        total_income,
        remaining: latest.map(|s| s.remaining).unwrap_or_default(),
        bills_due_count: due.len(),
        next_bills: due
            .iter()
            .take(DUE_BILL_PREVIEW)
            .map(|d| d.bill.name.clone())
            .collect(),
        total_debt: total_debt(debts),
        average_goal_completion: average,
        average_goal_pct: whole_percent(average),
    }
}
