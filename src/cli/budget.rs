//! Budget CLI commands
//!
//! `budget calc` splits what is left of a fortnight's income into the Fire,
//! Smile and Mojo buckets. Any input left off the command line falls back to
//! the value used last time, and the values used are remembered.

use clap::Subcommand;

use super::{parse_cycle, parse_money, parse_percent, AutoPush};
use crate::config::settings::{BudgetDefaults, Settings};
use crate::display::budget::format_calculation;
use crate::display::dashboard::format_dashboard;
use crate::engine::BillSelection;
use crate::error::{BudgetError, BudgetResult};
use crate::services::{BudgetService, CalculationRequest, DashboardService};
use crate::storage::BudgetStore;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Calculate the bucket split for a pay cycle
    Calc {
        /// First income
        #[arg(long)]
        income1: Option<String>,
        /// Second income
        #[arg(long)]
        income2: Option<String>,
        /// Money set aside to spend freely
        #[arg(long)]
        splurge: Option<String>,
        /// Fire bucket percentage of what remains
        #[arg(long)]
        fire: Option<String>,
        /// Smile bucket percentage of what remains
        #[arg(long)]
        smile: Option<String>,
        /// Which bills count: "due" (in the pay cycle) or "all"
        #[arg(long)]
        bills: Option<String>,
        /// Pay cycle start (YYYY-MM-DD or "today")
        #[arg(short, long)]
        cycle: Option<String>,
        /// Save the result to the history
        #[arg(long)]
        save: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    store: &BudgetStore,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    match cmd {
        BudgetCommands::Calc {
            income1,
            income2,
            splurge,
            fire,
            smile,
            bills,
            cycle,
            save,
        } => {
            let last = &settings.budget;
            let inputs = BudgetDefaults {
                income1: income1
                    .map(|v| parse_money(&v, "income1"))
                    .transpose()?
                    .unwrap_or(last.income1),
                income2: income2
                    .map(|v| parse_money(&v, "income2"))
                    .transpose()?
                    .unwrap_or(last.income2),
                splurge: splurge
                    .map(|v| parse_money(&v, "splurge"))
                    .transpose()?
                    .unwrap_or(last.splurge),
                fire_pct: fire
                    .map(|v| parse_percent(&v, "fire"))
                    .transpose()?
                    .unwrap_or(last.fire_pct),
                smile_pct: smile
                    .map(|v| parse_percent(&v, "smile"))
                    .transpose()?
                    .unwrap_or(last.smile_pct),
                bill_selection: match bills {
                    Some(raw) => BillSelection::parse(&raw).ok_or_else(|| {
                        BudgetError::Validation(format!(
                            "Invalid bill selection '{}'. Use 'due' or 'all'",
                            raw
                        ))
                    })?,
                    None => last.bill_selection,
                },
                pay_cycle_start: match cycle {
                    Some(raw) => Some(parse_cycle(&raw)?.start_date()),
                    None => last.pay_cycle_start,
                },
            };

            let service = BudgetService::new(store);
            let calculation = service.calculate(&CalculationRequest {
                income1: inputs.income1,
                income2: inputs.income2,
                splurge: inputs.splurge,
                fire_pct: inputs.fire_pct,
                smile_pct: inputs.smile_pct,
                selection: inputs.bill_selection,
                window: inputs.pay_cycle(),
            })?;

            print!("{}", format_calculation(&calculation, settings));

            if save {
                let remote = AutoPush::remote_for(store, settings);
                let push = AutoPush::new(store, remote.as_ref());
                let snapshot = push.created(service.save_snapshot(&calculation)?)?;
                println!();
                println!("Saved to history: {}", snapshot.id.short());
            }

            if inputs != *last {
                let mut updated = settings.clone();
                updated.budget = inputs;
                updated.save(store.paths())?;
            }
        }
    }

    Ok(())
}

/// Show the dashboard for the last entered incomes and pay cycle
pub fn handle_dashboard_command(store: &BudgetStore, settings: &Settings) -> BudgetResult<()> {
    let summary = DashboardService::new(store).summary(&settings.budget)?;
    print!("{}", format_dashboard(&summary, settings));
    Ok(())
}
