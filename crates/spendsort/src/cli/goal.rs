use clap::Subcommand;
use console::style;
use spendsort_lib::{Database, Profile, Result, SpendsortError, SqliteDatabase};

use crate::util::format_currency;

#[derive(Subcommand)]
pub enum GoalCommands {
    #[command(about = "Show current assets and progress toward the goal")]
    Show,

    #[command(about = "Update current assets or the goal amount")]
    Set {
        #[arg(long, help = "Current assets")]
        assets: Option<f64>,

        #[arg(long, help = "Goal amount")]
        target: Option<f64>,
    },
}

pub fn handle_goal_command(db: &mut SqliteDatabase, user: &str, action: GoalCommands) -> Result<()> {
    match action {
        GoalCommands::Show => {
            let profile = db.get_or_create_profile(user)?;
            println!();
            print_goal(&profile);
            Ok(())
        }
        GoalCommands::Set { assets, target } => set_goal(db, user, assets, target),
    }
}

fn set_goal(
    db: &mut SqliteDatabase,
    user: &str,
    assets: Option<f64>,
    target: Option<f64>,
) -> Result<()> {
    if assets.is_none() && target.is_none() {
        return Err(SpendsortError::UserInput(
            "pass --assets, --target or both".to_string(),
        ));
    }

    let profile = db
        .get_or_create_profile(user)?
        .with_updates(assets, target)?;
    db.save_profile(user, &profile)?;
    log::info!("Updated goal for {}", user);

    println!("\n{} Goal updated", style("✓").green());
    print_goal(&profile);
    Ok(())
}

/// Assets, goal and a progress bar, as shown by `goal show`, `report` and `status`.
pub fn print_goal(profile: &Profile) {
    const BAR_WIDTH: usize = 30;

    let percent = profile.progress();
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH.saturating_sub(filled))
    );

    println!("{}", style("Goal").bold());
    println!(
        "  Current assets: {}",
        style(format_currency(profile.current_assets)).green()
    );
    println!("  Goal: {}", format_currency(profile.goal_amount));
    println!("  Progress: {} {:.1}%", style(bar).cyan(), percent);
    println!();
}
