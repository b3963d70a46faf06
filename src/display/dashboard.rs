//! Dashboard display formatting

use crate::config::settings::Settings;
use crate::engine::DashboardSummary;

pub fn format_dashboard(summary: &DashboardSummary, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str("Dashboard\n");
    output.push_str(&format!(
        "  Total income:   {}\n",
        settings.money(summary.total_income)
    ));
    output.push_str(&format!(
        "  Remaining:      {}\n",
        settings.money(summary.remaining)
    ));

    let next = if summary.next_bills.is_empty() {
        String::new()
    } else {
        format!(" (next: {})", summary.next_bills.join(", "))
    };
    output.push_str(&format!(
        "  Bills due:      {}{}\n",
        summary.bills_due_count, next
    ));
    output.push_str(&format!(
        "  Total debt:     {}\n",
        settings.money(summary.total_debt)
    ));
    output.push_str(&format!(
        "  Goal progress:  {}%\n",
        summary.average_goal_pct
    ));

    output
}
