//! Goal display formatting

use rust_decimal::Decimal;
use tabled::Tabled;

use super::{or_dash, render_table};
use crate::config::settings::Settings;
use crate::engine::dashboard::whole_percent;
use crate::models::Goal;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

fn progress(goal: &Goal) -> String {
    format!("{}%", whole_percent(goal.completion() * Decimal::ONE_HUNDRED))
}

pub fn format_goal_list(goals: &[Goal], settings: &Settings) -> String {
    if goals.is_empty() {
        return "No goals found.".to_string();
    }

    let rows: Vec<GoalRow> = goals
        .iter()
        .map(|goal| GoalRow {
            id: goal.id.short(),
            name: goal.name.clone(),
            saved: settings.money(goal.saved_amount),
            target: settings.money(goal.target_amount),
            progress: progress(goal),
            deadline: or_dash(goal.deadline.map(|d| settings.date(d))),
            priority: goal.priority.to_string(),
        })
        .collect();
    render_table(rows)
}

pub fn format_goal_details(goal: &Goal, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Goal: {}\n", goal.name));
    output.push_str(&format!("  ID:         {}\n", goal.id));
    output.push_str(&format!(
        "  Saved:      {} of {} ({})\n",
        settings.money(goal.saved_amount),
        settings.money(goal.target_amount),
        progress(goal)
    ));
    output.push_str(&format!("  Remaining:  {}\n", settings.money(goal.remaining())));
    output.push_str(&format!(
        "  Deadline:   {}\n",
        or_dash(goal.deadline.map(|d| settings.date(d)))
    ));
    output.push_str(&format!("  Priority:   {}\n", goal.priority));

    output
}
