use console::style;
use spendsort_lib::{db::transactions::get_category_stats, Database, Result, SqliteDatabase};

use crate::cli::goal::print_goal;
use crate::util::{format_currency, format_timestamp};

pub fn handle_status_command(db: &mut SqliteDatabase, user: &str) -> Result<()> {
    println!("\n{}", style("Spendsort Status").bold().cyan());
    println!("{}\n", style("═".repeat(60)).dim());
    println!("User: {}\n", style(user).bold());

    show_transaction_summary(db, user)?;
    print_goal(&db.get_or_create_profile(user)?);
    show_rule_summary(db, user)?;

    Ok(())
}

fn show_transaction_summary(db: &SqliteDatabase, user: &str) -> Result<()> {
    let stats = get_category_stats(db.conn(), user)?;
    let total: i64 = stats.iter().map(|s| s.transaction_count).sum();

    println!("{}", style("Transactions").bold());
    println!("  Total: {}", style(total).cyan());
    for stat in &stats {
        let count = if stat.category.is_uncategorized() {
            style(stat.transaction_count).yellow()
        } else {
            style(stat.transaction_count).green()
        };
        println!(
            "  {}: {} ({})",
            stat.category.label(),
            count,
            format_currency(stat.total_amount)
        );
    }
    println!();

    Ok(())
}

fn show_rule_summary(db: &mut SqliteDatabase, user: &str) -> Result<()> {
    let rule_set = db.get_or_create_rule_set(user)?;

    println!("{}", style("Rules").bold());
    println!("  Rules: {}", rule_set.rules().len());
    println!("  Keywords: {}", rule_set.keyword_count());
    println!(
        "  Last updated: {}",
        format_timestamp(&rule_set.last_updated())
    );
    println!();

    Ok(())
}
