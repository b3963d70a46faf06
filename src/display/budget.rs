//! Budget calculation and history display formatting

use tabled::Tabled;

use super::{format_percent, or_dash, render_table};
use crate::config::settings::Settings;
use crate::engine::BillSelection;
use crate::models::BudgetSnapshot;
use crate::services::Calculation;

/// Format a calculation: incomes, the bills counted, and the three buckets
pub fn format_calculation(calculation: &Calculation, settings: &Settings) -> String {
    let input = &calculation.input;
    let allocation = &calculation.allocation;
    let mut output = String::new();

    match (calculation.selection, calculation.pay_cycle_start) {
        (BillSelection::All, _) => output.push_str("Bills: all bills\n"),
        (BillSelection::DueInWindow, Some(start)) => output.push_str(&format!(
            "Bills: due in the pay cycle starting {}\n",
            settings.date(start)
        )),
        (BillSelection::DueInWindow, None) => {
            output.push_str("Bills: none (no pay cycle set)\n")
        }
    }
    for bill in &calculation.bills {
        let due = bill
            .due_date
            .map(|d| format!("  ({})", settings.date(d)))
            .unwrap_or_default();
        output.push_str(&format!(
            "  - {:<24} {:>12}{}\n",
            bill.name,
            settings.money(bill.amount),
            due
        ));
    }

    output.push('\n');
    output.push_str(&format!("  Income 1:      {:>12}\n", settings.money(input.income1)));
    output.push_str(&format!("  Income 2:      {:>12}\n", settings.money(input.income2)));
    output.push_str(&format!(
        "  Total income:  {:>12}\n",
        settings.money(allocation.total_income)
    ));
    output.push_str(&format!("  Splurge:       {:>12}\n", settings.money(input.splurge)));
    output.push_str(&format!(
        "  Bills due:     {:>12}\n",
        settings.money(allocation.bills_due)
    ));
    output.push_str(&format!(
        "  Remaining:     {:>12}\n",
        settings.money(allocation.remaining)
    ));

    output.push('\n');
    output.push_str(&format!(
        "  Fire  {:>6}   {:>12}\n",
        format_percent(input.fire_pct),
        settings.money(allocation.fire)
    ));
    output.push_str(&format!(
        "  Smile {:>6}   {:>12}\n",
        format_percent(input.smile_pct),
        settings.money(allocation.smile)
    ));
    output.push_str(&format!(
        "  Mojo  {:>6}   {:>12}\n",
        "rest",
        settings.money(allocation.mojo)
    ));

    if allocation.remaining.is_negative() {
        output.push_str("\nBills and splurge exceed income for this cycle.\n");
    }

    output
}

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Pay Cycle")]
    pay_cycle: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Bills")]
    bills: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Fire")]
    fire: String,
    #[tabled(rename = "Smile")]
    smile: String,
    #[tabled(rename = "Mojo")]
    mojo: String,
}

/// Snapshots in the order given (the history service lists newest first)
pub fn format_history_list(snapshots: &[BudgetSnapshot], settings: &Settings) -> String {
    if snapshots.is_empty() {
        return "No saved calculations.".to_string();
    }

    let rows: Vec<SnapshotRow> = snapshots
        .iter()
        .map(|s| SnapshotRow {
            id: s.id.short(),
            saved: s.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            pay_cycle: or_dash(s.pay_cycle_start.map(|d| settings.date(d))),
            income: settings.money(s.total_income),
            bills: settings.money(s.bills_due),
            remaining: settings.money(s.remaining),
            fire: settings.money(s.fire_amt),
            smile: settings.money(s.smile_amt),
            mojo: settings.money(s.mojo_amt),
        })
        .collect();
    render_table(rows)
}

pub fn format_snapshot_details(snapshot: &BudgetSnapshot, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Snapshot {}\n",
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("  ID:            {}\n", snapshot.id));
    output.push_str(&format!(
        "  Pay cycle:     {}\n",
        or_dash(snapshot.pay_cycle_start.map(|d| settings.date(d)))
    ));
    output.push_str(&format!("  Income 1:      {}\n", settings.money(snapshot.income1)));
    output.push_str(&format!("  Income 2:      {}\n", settings.money(snapshot.income2)));
    output.push_str(&format!(
        "  Total income:  {}\n",
        settings.money(snapshot.total_income)
    ));
    output.push_str(&format!("  Splurge:       {}\n", settings.money(snapshot.splurge)));
    output.push_str(&format!("  Bills due:     {}\n", settings.money(snapshot.bills_due)));
    output.push_str(&format!("  Remaining:     {}\n", settings.money(snapshot.remaining)));
    output.push_str(&format!(
        "  Fire:          {} ({})\n",
        settings.money(snapshot.fire_amt),
        format_percent(snapshot.fire_pct)
    ));
    output.push_str(&format!(
        "  Smile:         {} ({})\n",
        settings.money(snapshot.smile_amt),
        format_percent(snapshot.smile_pct)
    ));
    output.push_str(&format!("  Mojo:          {}\n", settings.money(snapshot.mojo_amt)));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::test_settings;
    use crate::engine::{allocate, AllocationInput};
    use crate::models::Money;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn calculation() -> Calculation {
        let input = AllocationInput {
            income1: Money::from_cents(100000),
            income2: Money::zero(),
            splurge: Money::from_cents(10000),
            bills_due: Money::from_cents(20000),
            fire_pct: dec!(30),
            smile_pct: dec!(20),
        };
        Calculation {
            allocation: allocate(&input).unwrap(),
            input,
            selection: BillSelection::DueInWindow,
            pay_cycle_start: NaiveDate::from_ymd_opt(2024, 1, 15),
            bills: Vec::new(),
        }
    }

    #[test]
    fn test_format_calculation() {
        let output = format_calculation(&calculation(), &test_settings());
        assert!(output.contains("pay cycle starting 2024-01-15"));
        assert!(output.contains("$700.00"));
        assert!(output.contains("$210.00"));
        assert!(output.contains("$140.00"));
        assert!(output.contains("$350.00"));
        assert!(!output.contains("exceed income"));
    }

    #[test]
    fn test_format_history() {
        let calc = calculation();
        let snapshot = BudgetSnapshot::record(
            &calc.input,
            &calc.allocation,
            calc.pay_cycle_start,
            Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap(),
        );

        let list = format_history_list(std::slice::from_ref(&snapshot), &test_settings());
        assert!(list.contains("2024-01-16 09:00"));
        assert!(list.contains("$350.00"));

        let details = format_snapshot_details(&snapshot, &test_settings());
        assert!(details.contains("Fire:          $210.00 (30%)"));
        assert!(format_history_list(&[], &test_settings()).contains("No saved calculations"));
    }
}
