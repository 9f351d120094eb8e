use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use serde_json::json;
use spendsort_lib::{
    category_totals, monthly_totals, Category, Database, Result, SpendsortError, SqliteDatabase,
    Transaction,
};
use std::path::PathBuf;

use crate::cli::goal::print_goal;
use crate::util::format_currency;

pub fn handle_report_command(db: &mut SqliteDatabase, user: &str) -> Result<()> {
    println!("\n{}", style("Spending Report").bold().cyan());
    println!("{}\n", style("═".repeat(60)).dim());

    print_goal(&db.get_or_create_profile(user)?);

    let transactions = db.list_transactions(user)?;
    if transactions.is_empty() {
        println!("{}", style("No transactions imported yet").yellow());
        return Ok(());
    }

    println!("{}", style("By Category").bold());
    println!("{}", style("─".repeat(60)).dim());

    let mut category_table = Table::new();
    category_table.load_preset(UTF8_FULL);
    category_table.set_header(vec![
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Transactions").fg(Color::Cyan),
        Cell::new("Total").fg(Color::Cyan),
        Cell::new("Share").fg(Color::Cyan),
    ]);
    for total in category_totals(&transactions) {
        category_table.add_row(vec![
            Cell::new(total.category.label()),
            Cell::new(total.count),
            Cell::new(format_currency(total.total)),
            Cell::new(format!("{:.1}%", total.share * 100.0)),
        ]);
    }
    println!("{}\n", category_table);

    println!("{}", style("Unnecessary Spending by Month").bold());
    println!("{}", style("─".repeat(60)).dim());

    let monthly = monthly_totals(&transactions, Category::UnnecessarySpending);
    if monthly.is_empty() {
        println!("{}\n", style("No unnecessary spending recorded").green());
    } else {
        let mut monthly_table = Table::new();
        monthly_table.load_preset(UTF8_FULL);
        monthly_table.set_header(vec![
            Cell::new("Month").fg(Color::Cyan),
            Cell::new("Transactions").fg(Color::Cyan),
            Cell::new("Total").fg(Color::Cyan),
        ]);
        for month in &monthly {
            monthly_table.add_row(vec![
                Cell::new(&month.month),
                Cell::new(month.count),
                Cell::new(format_currency(month.total)),
            ]);
        }
        println!("{}\n", monthly_table);
    }

    Ok(())
}

pub fn handle_export_command(
    db: &SqliteDatabase,
    user: &str,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let transactions = db.list_transactions(user)?;
    let content = match format.to_lowercase().as_str() {
        "json" => export_json(user, &transactions)?,
        "csv" => export_csv(&transactions)?,
        _ => {
            return Err(SpendsortError::Config(format!(
                "Unsupported export format '{}'. Use 'json' or 'csv'",
                format
            )))
        }
    };

    if let Some(path) = output {
        std::fs::write(&path, content)?;
        println!(
            "{} Exported {} transactions to {}",
            style("✓").green(),
            transactions.len(),
            path.display()
        );
    } else {
        print!("{}", content);
    }

    Ok(())
}

fn export_json(user: &str, transactions: &[Transaction]) -> Result<String> {
    let export = json!({
        "user": user,
        "transactions": transactions,
        "categories": category_totals(transactions),
        "generated_at": chrono::Utc::now().to_rfc3339(),
    });
    let mut json_str = serde_json::to_string_pretty(&export)?;
    json_str.push('\n');
    Ok(json_str)
}

fn export_csv(transactions: &[Transaction]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for transaction in transactions {
        writer.serialize(transaction)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SpendsortError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| SpendsortError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
