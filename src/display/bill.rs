//! Bill display formatting

use chrono::NaiveDate;
use tabled::Tabled;

use super::{or_dash, render_table};
use crate::config::settings::Settings;
use crate::engine::{next_occurrence_on_or_after, DueBill, UpcomingBill};
use crate::models::{Bill, Money, PayCycleWindow};

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Frequency")]
    frequency: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Next Due")]
    next_due: String,
}

/// Table of bills in stored order, with each bill's next due date from `today`
pub fn format_bill_list(bills: &[Bill], today: NaiveDate, settings: &Settings) -> String {
    if bills.is_empty() {
        return "No bills found.".to_string();
    }

    let rows: Vec<BillRow> = bills
        .iter()
        .map(|bill| BillRow {
            id: bill.id.short(),
            name: bill.name.clone(),
            amount: settings.money(bill.amount),
            frequency: bill.frequency.label(),
            start: match bill.start() {
                Ok(date) => settings.date(date),
                Err(_) => format!("{} (invalid)", bill.start_date),
            },
            next_due: or_dash(next_occurrence_on_or_after(bill, today).map(|d| settings.date(d))),
        })
        .collect();

    let total: Money = bills.iter().map(|b| b.amount).sum();
    format!(
        "{}\n{} bills, {} in total per occurrence",
        render_table(rows),
        bills.len(),
        settings.money(total)
    )
}

/// Format a single bill's details
pub fn format_bill_details(bill: &Bill, today: NaiveDate, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bill: {}\n", bill.name));
    output.push_str(&format!("  ID:         {}\n", bill.id));
    output.push_str(&format!("  Amount:     {}\n", settings.money(bill.amount)));
    output.push_str(&format!("  Frequency:  {}\n", bill.frequency));
    output.push_str(&format!("  Start:      {}\n", bill.start_date));
    output.push_str(&format!(
        "  Next due:   {}\n",
        or_dash(next_occurrence_on_or_after(bill, today).map(|d| settings.date(d)))
    ));

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        bill.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        bill.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[derive(Tabled)]
struct DueRow {
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Frequency")]
    frequency: String,
}

/// Bills due in a pay cycle, earliest occurrence first
pub fn format_due_bills(
    due: &[DueBill<'_>],
    window: Option<&PayCycleWindow>,
    settings: &Settings,
) -> String {
    let window = match window {
        Some(w) => w,
        None => return "No pay cycle set; no bills are due.".to_string(),
    };
    let heading = format!(
        "Pay cycle {} to {}",
        settings.date(window.start_date()),
        settings.date(window.end_date())
    );
    if due.is_empty() {
        return format!("{}\nNo bills due.", heading);
    }

    let rows: Vec<DueRow> = due
        .iter()
        .map(|d| DueRow {
            due: settings.date(d.due_date),
            name: d.bill.name.clone(),
            amount: settings.money(d.bill.amount),
            frequency: d.bill.frequency.label(),
        })
        .collect();
    let total: Money = due.iter().map(|d| d.bill.amount).sum();

    format!(
        "{}\n{}\nTotal due: {}",
        heading,
        render_table(rows),
        settings.money(total)
    )
}

#[derive(Tabled)]
struct UpcomingRow {
    #[tabled(rename = "Next Due")]
    next_due: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Every bill by next occurrence; bills with none left are listed last
pub fn format_upcoming(upcoming: &[UpcomingBill<'_>], settings: &Settings) -> String {
    if upcoming.is_empty() {
        return "No bills found.".to_string();
    }

    let rows: Vec<UpcomingRow> = upcoming
        .iter()
        .map(|u| UpcomingRow {
            next_due: u
                .next_due
                .map(|d| settings.date(d))
                .unwrap_or_else(|| "none".to_string()),
            name: u.bill.name.clone(),
            amount: settings.money(u.bill.amount),
        })
        .collect();
    render_table(rows)
}
