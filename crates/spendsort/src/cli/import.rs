use console::style;
use spendsort_lib::{import_transactions, parse_csv_file, Result, SqliteDatabase};
use std::path::Path;

use crate::util::create_spinner;

pub fn handle_import_command(db: &mut SqliteDatabase, user: &str, path: &Path, quiet: bool) -> Result<()> {
    let spinner = (!quiet).then(|| create_spinner(&format!("Reading {}", path.display())));

    let parsed = parse_csv_file(path)?;
    if let Some(spinner) = &spinner {
        spinner.set_message(format!("Classifying {} transactions", parsed.transactions.len()));
    }
    let summary = import_transactions(db, user, parsed.transactions)?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    if quiet {
        return Ok(());
    }

    println!(
        "{} Imported {} transactions from {}",
        style("✓").green(),
        style(summary.inserted).bold(),
        path.display()
    );
    println!("  Rows read: {}", parsed.stats.rows_read);
    if parsed.stats.skipped > 0 {
        println!("  Skipped rows: {}", style(parsed.stats.skipped).yellow());
    }
    if summary.duplicates > 0 {
        println!("  Already imported: {}", style(summary.duplicates).dim());
    }
    println!("  Categorized: {}", style(summary.categorized).green());
    println!("  Uncategorized: {}", style(summary.uncategorized).yellow());

    if summary.uncategorized > 0 {
        println!(
            "\n{} Run 'spendsort review' to sort the rest",
            style("→").cyan()
        );
    }

    Ok(())
}
