//! Row adapter for the hosted datastore
//!
//! Rows written by older clients use a mix of snake_case and camelCase
//! column names, send amounts as numbers or numeric strings and sometimes
//! leave columns out. Everything is normalized here into the canonical
//! records; the rest of the crate never sees a raw row.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::engine::{allocate, AllocationInput};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    parse_bill_date, parse_timestamp, Bill, BillId, BudgetSnapshot, CustomUnit, Debt, DebtId,
    Frequency, Goal, GoalId, Money, Priority, SnapshotId,
};

/// One row of a remote table
pub type Row = Map<String, Value>;

fn malformed(what: &str, detail: impl std::fmt::Display) -> BudgetError {
    BudgetError::Sync(format!("Malformed {} row: {}", what, detail))
}

/// First of `names` that is present and not null
fn field<'r>(row: &'r Row, names: &[&str]) -> Option<&'r Value> {
    names
        .iter()
        .filter_map(|name| row.get(*name))
        .find(|value| !value.is_null())
}

fn text(row: &Row, names: &[&str]) -> Option<String> {
    match field(row, names)? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decimal(row: &Row, names: &[&str]) -> Result<Option<Decimal>, String> {
    let raw = match field(row, names) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().trim_start_matches('$').to_string(),
        Some(other) => return Err(format!("{} is not a number", other)),
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map(Some)
        .map_err(|_| format!("'{}' is not a number", raw))
}

fn money(row: &Row, names: &[&str]) -> Result<Option<Money>, String> {
    match decimal(row, names)? {
        None => Ok(None),
        Some(d) => Money::from_decimal(d)
            .map(Some)
            .ok_or_else(|| format!("{} is out of range", d)),
    }
}

fn required_money(row: &Row, names: &[&str], what: &str) -> BudgetResult<Money> {
    money(row, names)
        .map_err(|e| malformed(what, e))?
        .ok_or_else(|| malformed(what, format!("missing {}", names[0])))
}

fn percent(row: &Row, names: &[&str], what: &str) -> BudgetResult<Decimal> {
    Ok(decimal(row, names)
        .map_err(|e| malformed(what, e))?
        .unwrap_or_default())
}

fn required_name(row: &Row, what: &str) -> BudgetResult<String> {
    text(row, &["name"]).ok_or_else(|| malformed(what, "missing name"))
}

/// The remote id of a row, whether stored as a number or a string
pub fn row_id(row: &Row) -> Option<String> {
    text(row, &["id"])
}

fn created_at(row: &Row) -> DateTime<Utc> {
    text(row, &["created_at", "createdAt"])
        .and_then(|raw| parse_timestamp(&raw).ok())
        .unwrap_or_else(Utc::now)
}

fn priority(row: &Row) -> Priority {
    text(row, &["priority"])
        .and_then(|p| Priority::parse(&p))
        .unwrap_or_default()
}

fn number(amount: Decimal) -> Value {
    Number::from_str(&amount.normalize().to_string()).map_or(Value::Null, Value::Number)
}

fn money_value(amount: Money) -> Value {
    number(amount.to_decimal())
}

fn frequency(row: &Row) -> BudgetResult<Frequency> {
    let label = text(row, &["frequency"]).ok_or_else(|| malformed("bill", "missing frequency"))?;
    if let Some(named) = Frequency::parse(&label) {
        return Ok(named);
    }
    if !label.eq_ignore_ascii_case("custom") {
        return Err(malformed("bill", format!("unknown frequency '{}'", label)));
    }

    let unit = match text(row, &["custom_unit", "customUnit"]) {
        None => CustomUnit::Week,
        Some(raw) => CustomUnit::parse(&raw)
            .ok_or_else(|| malformed("bill", format!("unknown custom unit '{}'", raw)))?,
    };
    let value = match decimal(row, &["custom_value", "customValue"]).map_err(|e| malformed("bill", e))? {
        None => 1,
        Some(v) => v
            .to_u32()
            .filter(|v| *v >= 1)
            .ok_or_else(|| malformed("bill", format!("custom interval {} must be at least 1", v)))?,
    };
    Ok(Frequency::custom(unit, value))
}

pub fn bill_from_row(row: &Row) -> BudgetResult<Bill> {
    let name = required_name(row, "bill")?;
    let amount = required_money(row, &["amount", "amt", "value"], "bill")?;
    let frequency = frequency(row)?;
    let start_date = text(row, &["start_date", "startDate"])
        .ok_or_else(|| malformed("bill", "missing start_date"))?;

    let created_at = created_at(row);
    Ok(Bill {
        id: row_id(row).map(BillId::from_raw).unwrap_or_default(),
        name,
        amount,
        frequency,
        start_date,
        created_at,
        updated_at: created_at,
    })
}

pub fn bill_to_row(bill: &Bill) -> Row {
    let mut row = Row::new();
    row.insert("name".into(), bill.name.clone().into());
    row.insert("amount".into(), money_value(bill.amount));
    match bill.frequency {
        Frequency::Custom { unit, value } => {
            row.insert("frequency".into(), "Custom".into());
            row.insert("custom_unit".into(), unit.as_str().into());
            row.insert("custom_value".into(), value.into());
        }
        other => {
            row.insert("frequency".into(), other.label().into());
        }
    }
    row.insert("start_date".into(), bill.start_date.clone().into());
    row
}

pub fn debt_from_row(row: &Row) -> BudgetResult<Debt> {
    let name = required_name(row, "debt")?;
    let amount = required_money(row, &["amount", "amt", "value"], "debt")?;
    let min_payment = money(row, &["min_payment", "minPayment"])
        .map_err(|e| malformed("debt", e))?
        .unwrap_or_default();
    let initial_amount = money(row, &["initial_amount", "initialAmount"])
        .map_err(|e| malformed("debt", e))?
        .unwrap_or(amount);

    let created_at = created_at(row);
    Ok(Debt {
        id: row_id(row).map(DebtId::from_raw).unwrap_or_default(),
        name,
        amount,
        min_payment,
        interest: percent(row, &["interest", "interest_rate"], "debt")?,
        priority: priority(row),
        initial_amount,
        created_at,
        updated_at: created_at,
    })
}

pub fn debt_to_row(debt: &Debt) -> Row {
    let mut row = Row::new();
    row.insert("name".into(), debt.name.clone().into());
    row.insert("amount".into(), money_value(debt.amount));
    row.insert("min_payment".into(), money_value(debt.min_payment));
    row.insert("interest".into(), number(debt.interest));
    row.insert("priority".into(), debt.priority.to_string().into());
    row.insert("initial_amount".into(), money_value(debt.initial_amount));
    row
}

pub fn goal_from_row(row: &Row) -> BudgetResult<Goal> {
    let name = required_name(row, "goal")?;
    let target_amount = required_money(row, &["target", "targetAmount", "target_amount"], "goal")?;
    let saved_amount = money(row, &["saved", "savedAmount", "saved_amount"])
        .map_err(|e| malformed("goal", e))?
        .unwrap_or_default();
    let deadline = text(row, &["deadline", "target_date", "date"])
        .and_then(|raw| parse_bill_date(&raw).ok());

    let created_at = created_at(row);
    Ok(Goal {
        id: row_id(row).map(GoalId::from_raw).unwrap_or_default(),
        name,
        target_amount,
        saved_amount,
        deadline,
        priority: priority(row),
        created_at,
        updated_at: created_at,
    })
}

pub fn goal_to_row(goal: &Goal) -> Row {
    let mut row = Row::new();
    row.insert("name".into(), goal.name.clone().into());
    row.insert("target".into(), money_value(goal.target_amount));
    row.insert("saved".into(), money_value(goal.saved_amount));
    row.insert("priority".into(), goal.priority.to_string().into());
    if let Some(deadline) = goal.deadline {
        row.insert("deadline".into(), deadline.format("%Y-%m-%d").to_string().into());
    }
    row
}

/// Rebuild a snapshot from its inputs
///
/// The bucket amounts are recomputed from the stored incomes and percentages
/// rather than trusted from the row, so the buckets always balance.
pub fn snapshot_from_row(row: &Row) -> BudgetResult<BudgetSnapshot> {
    let timestamp = text(row, &["timestamp", "ts"])
        .ok_or_else(|| malformed("snapshot", "missing timestamp"))
        .and_then(|raw| parse_timestamp(&raw).map_err(|e| malformed("snapshot", e)))?;
    let optional = |names: &[&str]| -> BudgetResult<Money> {
        Ok(money(row, names)
            .map_err(|e| malformed("snapshot", e))?
            .unwrap_or_default())
    };

    let input = AllocationInput {
        income1: optional(&["income1"])?,
        income2: optional(&["income2"])?,
        splurge: optional(&["splurge"])?,
        bills_due: optional(&["bills_due", "bills"])?,
        fire_pct: percent(row, &["fire_pct", "firePct"], "snapshot")?,
        smile_pct: percent(row, &["smile_pct", "smilePct"], "snapshot")?,
    };
    let allocation = allocate(&input).map_err(|e| malformed("snapshot", e))?;
    let pay_cycle_start = text(row, &["pay_cycle", "pay_cycle_start", "payCycle"])
        .and_then(|raw| parse_bill_date(&raw).ok());

    let mut snapshot = BudgetSnapshot::record(&input, &allocation, pay_cycle_start, timestamp);
    if let Some(id) = row_id(row) {
        snapshot.id = SnapshotId::from_raw(id);
    }
    Ok(snapshot)
}

pub fn snapshot_to_row(snapshot: &BudgetSnapshot) -> Row {
    let mut row = Row::new();
    row.insert(
        "timestamp".into(),
        snapshot
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            .into(),
    );
    row.insert(
        "pay_cycle".into(),
        snapshot
            .pay_cycle_start
            .map_or(Value::Null, |d| d.format("%Y-%m-%d").to_string().into()),
    );
    for (column, amount) in [
        ("income1", snapshot.income1),
        ("income2", snapshot.income2),
        ("splurge", snapshot.splurge),
        ("bills", snapshot.bills_due),
        ("fire_amt", snapshot.fire_amt),
        ("smile_amt", snapshot.smile_amt),
        ("mojo_amt", snapshot.mojo_amt),
        ("remaining", snapshot.remaining),
        ("total_income", snapshot.total_income),
    ] {
        row.insert(column.into(), money_value(amount));
    }
    row.insert("fire_pct".into(), number(snapshot.fire_pct));
    row.insert("smile_pct".into(), number(snapshot.smile_pct));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_bill_with_camel_case_fields() {
        let bill = bill_from_row(&row(json!({
            "id": 42,
            "name": "Rent",
            "amount": 1200.5,
            "frequency": "Fortnightly",
            "startDate": "2024-01-01"
        })))
        .unwrap();

        assert_eq!(bill.id.as_str(), "42");
        assert_eq!(bill.amount.cents(), 120050);
        assert_eq!(bill.frequency, Frequency::Fortnightly);
        assert_eq!(bill.start().unwrap(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_bill_labels_and_custom_fields() {
        let once = bill_from_row(&row(json!({
            "name": "Fine", "amt": "80", "frequency": "Once Off",
            "start_date": "2024-03-05T00:00:00+00:00"
        })))
        .unwrap();
        assert_eq!(once.frequency, Frequency::OnceOff);
        assert_eq!(once.amount.cents(), 8000);

        let quarterly = bill_from_row(&row(json!({
            "name": "Insurance", "value": 300, "frequency": "Custom",
            "customUnit": "Month", "customValue": "3", "start_date": "2024-01-01"
        })))
        .unwrap();
        assert_eq!(quarterly.frequency, Frequency::custom(CustomUnit::Month, 3));

        let defaulted = bill_from_row(&row(json!({
            "name": "Cleaner", "amount": 60, "frequency": "custom", "start_date": "2024-01-01"
        })))
        .unwrap();
        assert_eq!(defaulted.frequency, Frequency::custom(CustomUnit::Week, 1));
    }

    #[test]
    fn test_malformed_bills_rejected() {
        let bad_rows = [
            json!({"amount": 10, "frequency": "Weekly", "start_date": "2024-01-01"}),
            json!({"name": "X", "amount": "ten", "frequency": "Weekly", "start_date": "2024-01-01"}),
            json!({"name": "X", "amount": 10, "frequency": "Hourly", "start_date": "2024-01-01"}),
            json!({"name": "X", "amount": 10, "frequency": "Custom", "custom_value": 0, "start_date": "2024-01-01"}),
            json!({"name": "X", "amount": 10, "frequency": "Weekly"}),
        ];
        for bad in bad_rows {
            let err = bill_from_row(&row(bad)).unwrap_err();
            assert!(matches!(err, BudgetError::Sync(_)));
        }
    }

    #[test]
    fn test_debt_fallbacks() {
        let debt = debt_from_row(&row(json!({
            "id": "abc", "name": "Card", "amount": 500, "minPayment": 25,
            "interest": "19.99", "priority": "high"
        })))
        .unwrap();
        assert_eq!(debt.min_payment.cents(), 2500);
        assert_eq!(debt.interest, dec!(19.99));
        assert_eq!(debt.priority, Priority::High);
        assert_eq!(debt.initial_amount.cents(), 50000);

        let debt = debt_from_row(&row(json!({
            "name": "Loan", "amount": 400, "initial_amount": 1000, "min_payment": null
        })))
        .unwrap();
        assert_eq!(debt.initial_amount.cents(), 100000);
        assert!(debt.min_payment.is_zero());
        assert_eq!(debt.progress_pct(), 60);
        assert_eq!(debt.priority, Priority::Medium);
    }

    #[test]
    fn test_goal_fallbacks() {
        let goal = goal_from_row(&row(json!({
            "name": "Holiday", "target": 3000, "saved": 750, "deadline": ""
        })))
        .unwrap();
        assert_eq!(goal.target_amount.cents(), 300000);
        assert_eq!(goal.saved_amount.cents(), 75000);
        assert!(goal.deadline.is_none());

        let goal = goal_from_row(&row(json!({
            "name": "Car", "targetAmount": 100, "target_date": "2025-06-30"
        })))
        .unwrap();
        assert!(goal.saved_amount.is_zero());
        assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2025, 6, 30));
    }

    #[test]
    fn test_snapshot_recomputes_buckets() {
        let snapshot = snapshot_from_row(&row(json!({
            "id": 7,
            "timestamp": "2024-01-15T09:00:00",
            "pay_cycle": "2024-01-15",
            "income1": 1000, "income2": 0, "splurge": 100, "bills": 200,
            "fire_pct": 30, "smile_pct": 20, "remaining": 700
        })))
        .unwrap();

        assert_eq!(snapshot.id.as_str(), "7");
        assert_eq!(snapshot.bills_due.cents(), 20000);
        assert_eq!(snapshot.fire_amt.cents(), 21000);
        assert_eq!(snapshot.smile_amt.cents(), 14000);
        assert_eq!(snapshot.mojo_amt.cents(), 35000);
        assert!(snapshot.is_balanced());
    }

    #[test]
    fn test_snapshot_with_bad_percentages_rejected() {
        let err = snapshot_from_row(&row(json!({
            "ts": "2024-01-15T09:00:00", "income1": 1000, "fire_pct": 80, "smile_pct": 30
        })))
        .unwrap_err();
        assert!(err.to_string().contains("Malformed snapshot row"));
    }

    #[test]
    fn test_rows_read_back_as_the_same_records() {
        let bill = Bill::new(
            "Insurance",
            Money::from_cents(30099),
            Frequency::custom(CustomUnit::Year, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        );
        let back = bill_from_row(&bill_to_row(&bill)).unwrap();
        assert_eq!(back.amount, bill.amount);
        assert_eq!(back.frequency, bill.frequency);
        assert_eq!(back.start_date, bill.start_date);

        let mut debt = Debt::new("Card", Money::from_cents(123456));
        debt.interest = dec!(21.5);
        debt.apply_payment(Money::from_cents(456)).unwrap();
        let back = debt_from_row(&debt_to_row(&debt)).unwrap();
        assert_eq!(back.amount, debt.amount);
        assert_eq!(back.initial_amount, debt.initial_amount);
        assert_eq!(back.interest, debt.interest);
    }
}
