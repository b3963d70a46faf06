//! History CSV export and import
//!
//! One row per snapshot, amounts in currency units with two decimals and
//! timestamps in RFC 3339. Reading a file written here gives back the same
//! snapshot field values.

use std::io::{Read, Write};
use std::str::FromStr;

use chrono::SecondsFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{parse_bill_date, parse_timestamp, BudgetSnapshot, Money, SnapshotId};

/// Column order of the history CSV
pub const HISTORY_CSV_HEADER: [&str; 13] = [
    "ts",
    "pay_cycle",
    "income1",
    "income2",
    "splurge",
    "bills_due",
    "fire_pct",
    "smile_pct",
    "fire_amt",
    "smile_amt",
    "mojo_amt",
    "remaining",
    "total_income",
];

#[derive(Debug, Serialize, Deserialize)]
struct HistoryCsvRow {
    ts: String,
    pay_cycle: String,
    income1: String,
    income2: String,
    splurge: String,
    bills_due: String,
    fire_pct: String,
    smile_pct: String,
    fire_amt: String,
    smile_amt: String,
    mojo_amt: String,
    remaining: String,
    total_income: String,
}

impl From<&BudgetSnapshot> for HistoryCsvRow {
    fn from(snapshot: &BudgetSnapshot) -> Self {
        Self {
            ts: snapshot
                .timestamp
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            pay_cycle: snapshot
                .pay_cycle_start
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            income1: snapshot.income1.to_plain_string(),
            income2: snapshot.income2.to_plain_string(),
            splurge: snapshot.splurge.to_plain_string(),
            bills_due: snapshot.bills_due.to_plain_string(),
            fire_pct: snapshot.fire_pct.to_string(),
            smile_pct: snapshot.smile_pct.to_string(),
            fire_amt: snapshot.fire_amt.to_plain_string(),
            smile_amt: snapshot.smile_amt.to_plain_string(),
            mojo_amt: snapshot.mojo_amt.to_plain_string(),
            remaining: snapshot.remaining.to_plain_string(),
            total_income: snapshot.total_income.to_plain_string(),
        }
    }
}

impl HistoryCsvRow {
    fn into_snapshot(self, line: usize) -> BudgetResult<BudgetSnapshot> {
        let bad = |column: &str, value: &str| {
            BudgetError::Import(format!(
                "Line {}: invalid {} value '{}'",
                line, column, value
            ))
        };
        let amount = |column: &str, value: &str| {
            Money::parse(value).map_err(|_| bad(column, value))
        };
        let percent = |column: &str, value: &str| {
            Decimal::from_str(value.trim()).map_err(|_| bad(column, value))
        };

        let timestamp = parse_timestamp(&self.ts).map_err(|_| bad("ts", &self.ts))?;
        let pay_cycle_start = match self.pay_cycle.trim() {
            "" => None,
            raw => Some(parse_bill_date(raw).map_err(|_| bad("pay_cycle", raw))?),
        };

        let snapshot = BudgetSnapshot {
            id: SnapshotId::new(),
            timestamp,
            pay_cycle_start,
            income1: amount("income1", &self.income1)?,
            income2: amount("income2", &self.income2)?,
            splurge: amount("splurge", &self.splurge)?,
            bills_due: amount("bills_due", &self.bills_due)?,
            fire_pct: percent("fire_pct", &self.fire_pct)?,
            smile_pct: percent("smile_pct", &self.smile_pct)?,
            fire_amt: amount("fire_amt", &self.fire_amt)?,
            smile_amt: amount("smile_amt", &self.smile_amt)?,
            mojo_amt: amount("mojo_amt", &self.mojo_amt)?,
            remaining: amount("remaining", &self.remaining)?,
            total_income: amount("total_income", &self.total_income)?,
        };
        snapshot
            .verify()
            .map_err(|e| BudgetError::Import(format!("Line {}: {}", line, e)))?;
        Ok(snapshot)
    }
}

/// Write snapshots as history CSV, in the order given
pub fn export_history_csv<W: Write>(
    snapshots: &[BudgetSnapshot],
    writer: W,
) -> BudgetResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if snapshots.is_empty() {
        csv_writer.write_record(HISTORY_CSV_HEADER)?;
    }
    for snapshot in snapshots {
        csv_writer.serialize(HistoryCsvRow::from(snapshot))?;
    }
    csv_writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))
}

/// Read snapshots from history CSV
///
/// Each imported snapshot gets a fresh id. The header must match exactly.
pub fn import_history_csv<R: Read>(reader: R) -> BudgetResult<Vec<BudgetSnapshot>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.iter().ne(HISTORY_CSV_HEADER.iter().copied()) {
        return Err(BudgetError::Import(format!(
            "Unexpected history CSV header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    csv_reader
        .deserialize::<HistoryCsvRow>()
        .enumerate()
        .map(|(idx, row)| {
            let line = idx + 2;
            row.map_err(|e| BudgetError::Import(format!("Line {}: {}", line, e)))?
                .into_snapshot(line)
        })
        .collect()
}
