use console::style;
use spendsort_lib::{reclassify_uncategorized, Database, Result, SqliteDatabase};

pub fn handle_classify_command(db: &mut SqliteDatabase, user: &str, quiet: bool) -> Result<()> {
    let updated = reclassify_uncategorized(db, user)?;
    if quiet {
        return Ok(());
    }

    let remaining = db.list_uncategorized(user, None)?.len();
    if updated == 0 {
        println!("{}", style("No uncategorized transactions matched the current rules").yellow());
    } else {
        println!(
            "{} Categorized {} transactions",
            style("✓").green(),
            style(updated).bold()
        );
    }
    if remaining > 0 {
        println!("  Still uncategorized: {}", style(remaining).yellow());
    }

    Ok(())
}
