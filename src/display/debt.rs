//! Debt display formatting

use tabled::Tabled;

use super::{format_percent, render_table};
use crate::config::settings::Settings;
use crate::engine::total_debt;
use crate::models::Debt;

#[derive(Tabled)]
struct DebtRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Min Payment")]
    min_payment: String,
    #[tabled(rename = "Interest")]
    interest: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Paid Off")]
    paid_off: String,
}

pub fn format_debt_list(debts: &[Debt], settings: &Settings) -> String {
    if debts.is_empty() {
        return "No debts found.".to_string();
    }

    let rows: Vec<DebtRow> = debts
        .iter()
        .map(|debt| DebtRow {
            id: debt.id.short(),
            name: debt.name.clone(),
            balance: settings.money(debt.amount),
            min_payment: settings.money(debt.min_payment),
            interest: format_percent(debt.interest),
            priority: debt.priority.to_string(),
            paid_off: format!("{}%", debt.progress_pct()),
        })
        .collect();

    format!(
        "{}\nTotal debt: {}",
        render_table(rows),
        settings.money(total_debt(debts))
    )
}

pub fn format_debt_details(debt: &Debt, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Debt: {}\n", debt.name));
    output.push_str(&format!("  ID:           {}\n", debt.id));
    output.push_str(&format!("  Balance:      {}\n", settings.money(debt.amount)));
    output.push_str(&format!(
        "  Started at:   {}\n",
        settings.money(debt.initial_amount)
    ));
    output.push_str(&format!("  Paid off:     {}%\n", debt.progress_pct()));
    output.push_str(&format!(
        "  Min payment:  {}\n",
        settings.money(debt.min_payment)
    ));
    output.push_str(&format!("  Interest:     {}\n", format_percent(debt.interest)));
    output.push_str(&format!("  Priority:     {}\n", debt.priority));

    output
}
