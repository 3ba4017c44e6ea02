use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use spendwise::cli::{
    handle_audit_command, handle_budget_command, handle_report_command,
    handle_transaction_command, BudgetCommands, ReportCommands, TransactionCommands,
};
use spendwise::config::{paths::SpendwisePaths, settings::Settings};
use spendwise::logging::{init_tracing, level_for_verbosity};
use spendwise::models::UserId;
use spendwise::storage::Storage;

#[derive(Parser)]
#[command(
    name = "spendwise",
    version,
    about = "Track income, expenses and category budgets",
    long_about = "Spendwise records income and expense transactions and per-category \
                  budgets, then reports monthly summaries, spending by category and \
                  budgeted vs. actual spending."
)]
struct Cli {
    /// User whose data to work with
    #[arg(short, long, global = true, env = "SPENDWISE_USER")]
    user: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config {
        /// Store a default user for commands run without --user
        #[arg(long)]
        default_user: Option<String>,
    },

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn resolve_user(flag: Option<String>, settings: &Settings) -> Result<UserId> {
    let candidate = flag.or_else(|| settings.default_user.clone());
    match candidate.as_deref().and_then(UserId::new) {
        Some(user) => Ok(user),
        None => bail!(
            "No user given. Pass --user, set SPENDWISE_USER, or run \
             'spendwise config --default-user <ID>'"
        ),
    }
}

/// Resolve the acting user, then load their data directory
fn open_for_user(
    paths: SpendwisePaths,
    settings: &Settings,
    user_flag: Option<String>,
) -> Result<(Storage, UserId)> {
    let user = resolve_user(user_flag, settings)?;

    let mut storage = Storage::new(paths)?.with_audit(settings.audit_enabled);
    storage.load_all()?;

    Ok((storage, user))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = SpendwisePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    init_tracing(&level_for_verbosity(cli.verbose, &settings.log_level));
    debug!(data_dir = %paths.data_dir().display(), "starting");

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Spendwise - personal finance tracking");
            println!();
            println!("Run 'spendwise --help' for usage information.");
            return Ok(());
        }
    };

    match command {
        Commands::Init => {
            println!("Initializing Spendwise at: {}", paths.base_dir().display());
            spendwise::storage::init::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'spendwise --user <ID> transaction add expense 12.50 Food' to record spending.");
        }
        Commands::Config { default_user } => {
            if let Some(user) = default_user {
                let Some(user) = UserId::new(&user) else {
                    bail!("Default user must not be empty");
                };
                settings.default_user = Some(user.as_str().to_string());
                settings.save(&paths)?;
                println!("Default user set to '{}'", user);
                println!();
            }

            println!("Spendwise Configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!(
                "  Default user:          {}",
                settings.default_user.as_deref().unwrap_or("(none)")
            );
            println!("  Default budget period: {}", settings.default_budget_period);
            println!("  Log level:             {}", settings.log_level);
            println!("  Audit enabled:         {}", settings.audit_enabled);
        }
        Commands::Transaction(cmd) => {
            let (storage, user) = open_for_user(paths, &settings, cli.user)?;
            handle_transaction_command(&storage, &user, cmd)?;
        }
        Commands::Budget(cmd) => {
            let (storage, user) = open_for_user(paths, &settings, cli.user)?;
            handle_budget_command(&storage, &user, settings.default_budget_period, cmd)?;
        }
        Commands::Report(cmd) => {
            let (storage, user) = open_for_user(paths, &settings, cli.user)?;
            handle_report_command(&storage, &user, cmd)?;
        }
        Commands::Audit { limit } => {
            let (storage, user) = open_for_user(paths, &settings, cli.user)?;
            handle_audit_command(&storage, &user, limit)?;
        }
    }

    Ok(())
}
