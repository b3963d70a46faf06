use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

use fortnight_cli::cli::{
    handle_audit_command, handle_bill_command, handle_budget_command, handle_config_command,
    handle_dashboard_command, handle_debt_command, handle_export_command, handle_goal_command,
    handle_history_command, handle_import_command, handle_init_command, handle_sync_command,
};
use fortnight_cli::config::{paths::FortnightPaths, settings::Settings};
use fortnight_cli::logging::init_logging;
use fortnight_cli::storage::BudgetStore;

#[derive(Parser)]
#[command(
    name = "fortnight",
    version,
    about = "Terminal bill tracker and fortnightly bucket budgeting",
    long_about = "Fortnight tracks your bills, debts and savings goals, shows which \
                  bills fall due in each 14-day pay cycle, and splits what is left \
                  of your pay into Fire, Smile and Mojo buckets."
)]
struct Cli {
    /// Log progress to stderr (FORTNIGHT_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config(fortnight_cli::cli::ConfigArgs),

    /// Bill management commands
    #[command(subcommand)]
    Bill(fortnight_cli::cli::BillCommands),

    /// Debt management commands
    #[command(subcommand)]
    Debt(fortnight_cli::cli::DebtCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(fortnight_cli::cli::GoalCommands),

    /// Bucket budget calculation
    #[command(subcommand)]
    Budget(fortnight_cli::cli::BudgetCommands),

    /// Saved budget calculations
    #[command(subcommand)]
    History(fortnight_cli::cli::HistoryCommands),

    /// Overview of bills, debts, goals and the last calculation
    #[command(alias = "dash")]
    Dashboard,

    /// Export data
    #[command(subcommand)]
    Export(fortnight_cli::cli::ExportCommands),

    /// Import data
    #[command(subcommand)]
    Import(fortnight_cli::cli::ImportCommands),

    /// Synchronize with a remote row store
    #[command(subcommand)]
    Sync(fortnight_cli::cli::SyncCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
        /// Only entries for this entity type (bill, debt, goal, snapshot, settings)
        #[arg(short, long)]
        entity: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose)?;

    // Initialize paths and settings
    let paths = FortnightPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    debug!("Using data directory {}", paths.base_dir().display());

    if matches!(cli.command, Some(Commands::Init)) {
        handle_init_command(&paths, &settings)?;
        return Ok(());
    }

    let store = BudgetStore::open(paths)?;

    match cli.command {
        Some(Commands::Init) => {}
        Some(Commands::Config(args)) => handle_config_command(&store, &settings, args)?,
        Some(Commands::Bill(cmd)) => handle_bill_command(&store, &settings, cmd)?,
        Some(Commands::Debt(cmd)) => handle_debt_command(&store, &settings, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&store, &settings, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&store, &settings, cmd)?,
        Some(Commands::History(cmd)) => handle_history_command(&store, &settings, cmd)?,
        Some(Commands::Dashboard) => handle_dashboard_command(&store, &settings)?,
        Some(Commands::Export(cmd)) => handle_export_command(&store, cmd)?,
        Some(Commands::Import(cmd)) => handle_import_command(&store, cmd)?,
        Some(Commands::Sync(cmd)) => handle_sync_command(&store, &settings, cmd)?,
        Some(Commands::Audit { count, entity }) => handle_audit_command(&store, count, entity)?,
        None => {
            println!("Fortnight - bills and bucket budgeting for each pay cycle");
            println!();
            println!("Run 'fortnight --help' for usage information.");
            println!("Run 'fortnight init' to get started.");
        }
    }

    Ok(())
}
