pub mod classify;
pub mod goal;
pub mod import;
pub mod report;
pub mod review;
pub mod rules;
pub mod status;

use clap::{Parser, Subcommand};
use spendsort_lib::{Config, Database, Result, SqliteDatabase};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spendsort")]
#[command(about = "Sort bank transactions into spending categories and learn from your decisions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to database file")]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, help = "User whose rules and transactions to use")]
    pub user: Option<String>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, short = 'q', global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Import transactions from a bank CSV export")]
    Import {
        #[arg(help = "CSV file with Date, Description and Amount columns")]
        path: PathBuf,
    },

    #[command(about = "Review uncategorized transactions one at a time")]
    Review {
        #[arg(long, help = "Maximum number of transactions to review")]
        limit: Option<u32>,
    },

    #[command(about = "Apply current rules to uncategorized transactions")]
    Classify,

    #[command(about = "Manage categorization rules")]
    Rules {
        #[command(subcommand)]
        action: rules::RulesCommands,
    },

    #[command(about = "Show or update the savings goal")]
    Goal {
        #[command(subcommand)]
        action: goal::GoalCommands,
    },

    #[command(about = "Show goal progress and spending by category and month")]
    Report,

    #[command(about = "Export transactions")]
    Export {
        #[arg(help = "Export format (json, csv)")]
        format: String,

        #[arg(long, short = 'o', help = "Output file path")]
        output: Option<PathBuf>,
    },

    #[command(about = "Show transaction and rule counts")]
    Status,
}

pub fn init_database(db_path: Option<PathBuf>, cli_user: Option<&str>) -> Result<(SqliteDatabase, String)> {
    let config = Config::new(db_path)?;
    config.ensure_db_directory()?;
    let user = config.resolve_user(cli_user)?;

    let mut db = SqliteDatabase::open(&config.db_path)?;
    db.initialize()?;
    log::info!("Database: {}", config.db_path.display());

    Ok((db, user))
}
