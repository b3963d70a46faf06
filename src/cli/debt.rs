//! Debt CLI commands

use clap::Subcommand;

use super::{parse_money, parse_percent, parse_priority, AutoPush};
use crate::config::settings::Settings;
use crate::display::debt::{format_debt_details, format_debt_list};
use crate::display::format_percent;
use crate::error::BudgetResult;
use crate::services::{DebtChanges, DebtService};
use crate::storage::BudgetStore;

/// Debt subcommands
#[derive(Subcommand)]
pub enum DebtCommands {
    /// Add a new debt
    Add {
        /// Debt name
        name: String,
        /// Amount owed
        amount: String,
        /// Minimum payment
        #[arg(short, long, default_value = "0")]
        min_payment: String,
        /// Interest rate in percent
        #[arg(short, long, default_value = "0")]
        interest: String,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },
    /// List all debts
    List,
    /// Show debt details
    Show {
        /// Debt name or ID
        debt: String,
    },
    /// Edit a debt
    Edit {
        /// Debt name or ID
        debt: String,
        #[arg(short, long)]
        name: Option<String>,
        /// New amount owed (does not reset payoff progress)
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        min_payment: Option<String>,
        #[arg(short, long)]
        interest: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Delete a debt
    Delete {
        /// Debt name or ID
        debt: String,
    },
    /// Record a payment
    Pay {
        /// Debt name or ID
        debt: String,
        /// Payment amount
        amount: String,
    },
}

/// Handle a debt command
pub fn handle_debt_command(
    store: &BudgetStore,
    settings: &Settings,
    cmd: DebtCommands,
) -> BudgetResult<()> {
    let service = DebtService::new(store);
    let remote = AutoPush::remote_for(store, settings);
    let push = AutoPush::new(store, remote.as_ref());

    match cmd {
        DebtCommands::Add {
            name,
            amount,
            min_payment,
            interest,
            priority,
        } => {
            let debt = service.create(
                &name,
                parse_money(&amount, "amount")?,
                parse_money(&min_payment, "minimum payment")?,
                parse_percent(&interest, "interest")?,
                parse_priority(&priority)?,
            )?;
            let debt = push.created(debt)?;

            println!("Created debt: {}", debt.name);
            println!("  Amount:      {}", settings.money(debt.amount));
            println!("  Min payment: {}", settings.money(debt.min_payment));
            println!("  Interest:    {}", format_percent(debt.interest));
            println!("  Priority:    {}", debt.priority);
            println!("  ID: {}", debt.id);
        }

        DebtCommands::List => {
            println!("{}", format_debt_list(&service.list()?, settings));
        }

        DebtCommands::Show { debt } => {
            print!("{}", format_debt_details(&service.find(&debt)?, settings));
        }

        DebtCommands::Edit {
            debt,
            name,
            amount,
            min_payment,
            interest,
            priority,
        } => {
            let changes = DebtChanges {
                name,
                amount: amount.map(|a| parse_money(&a, "amount")).transpose()?,
                min_payment: min_payment
                    .map(|m| parse_money(&m, "minimum payment"))
                    .transpose()?,
                interest: interest
                    .map(|i| parse_percent(&i, "interest"))
                    .transpose()?,
                priority: priority.map(|p| parse_priority(&p)).transpose()?,
            };

            if changes.name.is_none()
                && changes.amount.is_none()
                && changes.min_payment.is_none()
                && changes.interest.is_none()
                && changes.priority.is_none()
            {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(&debt, changes)?;
            push.updated(&updated);
            println!("Updated debt: {}", updated.name);
        }

        DebtCommands::Delete { debt } => {
            let deleted = service.delete(&debt)?;
            push.deleted(&deleted);
            println!("Deleted debt: {}", deleted.name);
        }

        DebtCommands::Pay { debt, amount } => {
            let payment = parse_money(&amount, "payment")?;
            let updated = service.pay(&debt, payment)?;
            push.updated(&updated);

            println!(
                "Paid {} toward {}. Remaining: {}",
                settings.money(payment),
                updated.name,
                settings.money(updated.amount)
            );
            if updated.amount.is_zero() {
                println!("{} is paid off.", updated.name);
            }
        }
    }

    Ok(())
}
