mod cli;
mod util;

use clap::Parser;
use spendsort_lib::Result;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let (mut db, user) = cli::init_database(cli.db, cli.user.as_deref())?;
    log::debug!("Acting as user {}", user);

    match cli.command {
        cli::Commands::Import { path } => {
            cli::import::handle_import_command(&mut db, &user, &path, cli.quiet)
        }

        cli::Commands::Review { limit } => {
            cli::review::handle_review_command(&mut db, &user, limit)
        }

        cli::Commands::Classify => {
            cli::classify::handle_classify_command(&mut db, &user, cli.quiet)
        }

        cli::Commands::Rules { action } => {
            cli::rules::handle_rules_command(&mut db, &user, action)
        }

        cli::Commands::Goal { action } => {
            cli::goal::handle_goal_command(&mut db, &user, action)
        }

        cli::Commands::Report => {
            cli::report::handle_report_command(&mut db, &user)
        }

        cli::Commands::Export { format, output } => {
            cli::report::handle_export_command(&db, &user, &format, output)
        }

        cli::Commands::Status => {
            cli::status::handle_status_command(&mut db, &user)
        }
    }
}
