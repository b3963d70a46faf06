//! Savings goal CLI commands

use clap::Subcommand;

use super::{parse_date, parse_money, parse_priority, AutoPush};
use crate::config::settings::Settings;
use crate::display::goal::{format_goal_details, format_goal_list};
use crate::error::BudgetResult;
use crate::services::{GoalChanges, GoalService};
use crate::storage::BudgetStore;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a new savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },
    /// List all goals
    List,
    /// Show goal details
    Show {
        /// Goal name or ID
        goal: String,
    },
    /// Edit a goal
    Edit {
        /// Goal name or ID
        goal: String,
        #[arg(short, long)]
        name: Option<String>,
        /// New target; savings above it are reduced to match
        #[arg(short, long)]
        target: Option<String>,
        #[arg(short, long)]
        deadline: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Delete a goal
    Delete {
        /// Goal name or ID
        goal: String,
    },
    /// Put money toward a goal
    Deposit {
        /// Goal name or ID
        goal: String,
        /// Amount to add
        amount: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    store: &BudgetStore,
    settings: &Settings,
    cmd: GoalCommands,
) -> BudgetResult<()> {
    let service = GoalService::new(store);
    let remote = AutoPush::remote_for(store, settings);
    let push = AutoPush::new(store, remote.as_ref());

    match cmd {
        GoalCommands::Add {
            name,
            target,
            deadline,
            priority,
        } => {
            let deadline = deadline.map(|d| parse_date(&d)).transpose()?;
            let goal = service.create(
                &name,
                parse_money(&target, "target")?,
                deadline,
                parse_priority(&priority)?,
            )?;
            let goal = push.created(goal)?;

            println!("Created goal: {}", goal.name);
            println!("  Target:   {}", settings.money(goal.target_amount));
            if let Some(deadline) = goal.deadline {
                println!("  Deadline: {}", settings.date(deadline));
            }
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List => {
            println!("{}", format_goal_list(&service.list()?, settings));
        }

        GoalCommands::Show { goal } => {
            print!("{}", format_goal_details(&service.find(&goal)?, settings));
        }

        GoalCommands::Edit {
            goal,
            name,
            target,
            deadline,
            priority,
        } => {
            let changes = GoalChanges {
                name,
                target_amount: target.map(|t| parse_money(&t, "target")).transpose()?,
                deadline: deadline.map(|d| parse_date(&d)).transpose()?,
                priority: priority.map(|p| parse_priority(&p)).transpose()?,
            };

            if changes.name.is_none()
                && changes.target_amount.is_none()
                && changes.deadline.is_none()
                && changes.priority.is_none()
            {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(&goal, changes)?;
            push.updated(&updated);
            println!("Updated goal: {}", updated.name);
        }

        GoalCommands::Delete { goal } => {
            let deleted = service.delete(&goal)?;
            push.deleted(&deleted);
            println!("Deleted goal: {}", deleted.name);
        }

        GoalCommands::Deposit { goal, amount } => {
            let deposit = parse_money(&amount, "deposit")?;
            let updated = service.deposit(&goal, deposit)?;
            push.updated(&updated);

            println!(
                "Saved {} toward {}: {} of {}",
                settings.money(deposit),
                updated.name,
                settings.money(updated.saved_amount),
                settings.money(updated.target_amount)
            );
            if updated.remaining().is_zero() {
                println!("{} is fully funded.", updated.name);
            }
        }
    }

    Ok(())
}
