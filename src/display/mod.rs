//! Display formatting for terminal output
//!
//! Lists are rendered as `tabled` tables, detail views as aligned
//! label/value lines. Currency and dates go through [`Settings`] so the
//! configured symbol and date format apply everywhere.

pub mod bill;
pub mod budget;
pub mod dashboard;
pub mod debt;
pub mod goal;

pub use bill::{format_bill_details, format_bill_list, format_due_bills, format_upcoming};
pub use budget::{format_calculation, format_history_list, format_snapshot_details};
pub use dashboard::format_dashboard;
pub use debt::{format_debt_details, format_debt_list};
pub use goal::{format_goal_details, format_goal_list};

use rust_decimal::Decimal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[cfg(test)]
use crate::config::settings::Settings;

fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

/// `12.5` -> `12.5%`, `30.00` -> `30%`
pub fn format_percent(pct: Decimal) -> String {
    format!("{}%", pct.normalize())
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
fn test_settings() -> Settings {
    Settings::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(30.00)), "30%");
        assert_eq!(format_percent(dec!(12.5)), "12.5%");
        assert_eq!(format_percent(Decimal::ZERO), "0%");
    }
}
