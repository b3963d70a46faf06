//! Bill CLI commands

use clap::Subcommand;

use super::{parse_cycle, parse_date, parse_frequency, parse_money, today, AutoPush};
use crate::config::settings::Settings;
use crate::display::bill::{format_bill_details, format_bill_list, format_due_bills, format_upcoming};
use crate::engine::{due_bills, upcoming};
use crate::error::BudgetResult;
use crate::models::Frequency;
use crate::services::{BillChanges, BillService};
use crate::storage::BudgetStore;

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Add a new bill
    Add {
        /// Bill name
        name: String,
        /// Amount per occurrence (e.g., "120.50" or "120")
        amount: String,
        /// once-off, weekly, fortnightly (default), monthly, annually or custom
        #[arg(short, long)]
        frequency: Option<String>,
        /// Interval count for a custom frequency
        #[arg(long)]
        every: Option<u32>,
        /// Interval unit for a custom frequency (day, week, month, year)
        #[arg(long)]
        unit: Option<String>,
        /// First due date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        start: Option<String>,
    },
    /// List all bills
    List,
    /// Show bill details
    Show {
        /// Bill name or ID
        bill: String,
    },
    /// Edit a bill
    Edit {
        /// Bill name or ID
        bill: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New frequency
        #[arg(short, long)]
        frequency: Option<String>,
        /// New interval count (custom frequency)
        #[arg(long)]
        every: Option<u32>,
        /// New interval unit (custom frequency)
        #[arg(long)]
        unit: Option<String>,
        /// New first due date
        #[arg(short, long)]
        start: Option<String>,
    },
    /// Delete a bill
    Delete {
        /// Bill name or ID
        bill: String,
    },
    /// Bills due in a pay cycle
    Due {
        /// Pay cycle start (YYYY-MM-DD or "today", default the last one used)
        #[arg(short, long)]
        cycle: Option<String>,
    },
    /// Every bill by its next due date
    Next {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        from: Option<String>,
    },
}

/// Handle a bill command
pub fn handle_bill_command(
    store: &BudgetStore,
    settings: &Settings,
    cmd: BillCommands,
) -> BudgetResult<()> {
    let service = BillService::new(store);
    let remote = AutoPush::remote_for(store, settings);
    let push = AutoPush::new(store, remote.as_ref());

    match cmd {
        BillCommands::Add {
            name,
            amount,
            frequency,
            every,
            unit,
            start,
        } => {
            let amount = parse_money(&amount, "amount")?;
            let frequency = parse_frequency(frequency.as_deref(), every, unit.as_deref())?
                .unwrap_or(Frequency::Fortnightly);
            let start = match start {
                Some(raw) => parse_date(&raw)?,
                None => today(),
            };

            let bill = push.created(service.create(&name, amount, frequency, start)?)?;

            println!("Created bill: {}", bill.name);
            println!("  Amount:    {}", settings.money(bill.amount));
            println!("  Frequency: {}", bill.frequency);
            println!("  Start:     {}", bill.start_date);
            println!("  ID: {}", bill.id);
        }

        BillCommands::List => {
            let bills = service.list()?;
            println!("{}", format_bill_list(&bills, today(), settings));
        }

        BillCommands::Show { bill } => {
            let found = service.find(&bill)?;
            print!("{}", format_bill_details(&found, today(), settings));
        }

        BillCommands::Edit {
            bill,
            name,
            amount,
            frequency,
            every,
            unit,
            start,
        } => {
            let changes = BillChanges {
                name,
                amount: amount.map(|a| parse_money(&a, "amount")).transpose()?,
                frequency: parse_frequency(frequency.as_deref(), every, unit.as_deref())?,
                start_date: start.map(|s| parse_date(&s)).transpose()?,
            };

            if changes.is_empty() {
                println!("No changes specified. Use --name, --amount, --frequency or --start.");
                return Ok(());
            }

            let updated = service.update(&bill, changes)?;
            push.updated(&updated);
            println!("Updated bill: {}", updated.name);
        }

        BillCommands::Delete { bill } => {
            let deleted = service.delete(&bill)?;
            push.deleted(&deleted);
            println!("Deleted bill: {}", deleted.name);
        }

        BillCommands::Due { cycle } => {
            let window = match cycle {
                Some(raw) => Some(parse_cycle(&raw)?),
                None => settings.budget.pay_cycle(),
            };
            let bills = service.list()?;
            let due = due_bills(&bills, window.as_ref());
            println!("{}", format_due_bills(&due, window.as_ref(), settings));
        }

        BillCommands::Next { from } => {
            let reference = match from {
                Some(raw) => parse_date(&raw)?,
                None => today(),
            };
            let bills = service.list()?;
            println!("{}", format_upcoming(&upcoming(&bills, reference), settings));
        }
    }

    Ok(())
}
