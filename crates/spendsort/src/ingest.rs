//! Bank CSV ingestion and the batch classification pass.
//!
//! Expected columns are `Date`, `Description` and `Amount` (any case, any
//! position, extra columns ignored). Rows that cannot be turned into a
//! transaction are skipped and counted rather than failing the import.

use crate::categorize::rules::{classify, classify_all};
use crate::db::{Database, Transaction};
use crate::error::{Result, SpendsortError};
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

// `%y` must come before `%Y`: chrono's `%Y` also accepts a 2-digit year.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Dates before this year are treated as a mangled year field.
const MIN_YEAR: i32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub rows_read: usize,
    pub parsed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub transactions: Vec<Transaction>,
    pub stats: ParseStats,
}

/// Outcome of storing a parsed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub categorized: usize,
    pub uncategorized: usize,
}

pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> Result<ParsedCsv> {
    let file = std::fs::File::open(path.as_ref())?;
    log::info!("Parsing {}", path.as_ref().display());
    parse_csv_reader(file)
}

pub fn parse_csv_reader<R: Read>(reader: R) -> Result<ParsedCsv> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| SpendsortError::MissingColumn(name.to_string()))
    };
    let date_col = column("Date")?;
    let description_col = column("Description")?;
    let amount_col = column("Amount")?;

    let mut stats = ParseStats::default();
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut transactions = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        stats.rows_read += 1;
        // Header is line 1
        let line = idx + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping line {}: {}", line, e);
                stats.skipped += 1;
                continue;
            }
        };

        let field = |col: usize| record.get(col).map(str::trim).filter(|s| !s.is_empty());
        let (Some(date_str), Some(description), Some(amount_str)) =
            (field(date_col), field(description_col), field(amount_col))
        else {
            log::warn!("Skipping line {}: missing date, description or amount", line);
            stats.skipped += 1;
            continue;
        };

        let Some(date) = parse_date(date_str) else {
            log::warn!("Skipping line {}: unrecognized date {:?}", line, date_str);
            stats.skipped += 1;
            continue;
        };
        let Some(amount) = parse_amount(amount_str) else {
            log::warn!("Skipping line {}: unrecognized amount {:?}", line, amount_str);
            stats.skipped += 1;
            continue;
        };

        let key = format!("{}|{}|{}", date, description, amount);
        let occurrence = occurrences.entry(key).or_insert(0);
        let id = transaction_id(date, description, amount, *occurrence);
        *occurrence += 1;

        transactions.push(Transaction::new(id, date, description, amount));
        stats.parsed += 1;
    }

    log::info!(
        "Parsed {} of {} rows ({} skipped)",
        stats.parsed,
        stats.rows_read,
        stats.skipped
    );
    Ok(ParsedCsv {
        transactions,
        stats,
    })
}

/// `YYYY-MM-DD`, `MM/DD/YYYY` or `MM/DD/YY`. Two-digit years follow chrono:
/// 70 and up land in the 1900s, the rest in the 2000s.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .filter(|date| date.year() >= MIN_YEAR)
}

/// Parse an amount, tolerating a currency sign and thousands separators.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Stable id from the row content and its occurrence index within the file.
pub fn transaction_id(date: NaiveDate, description: &str, amount: f64, occurrence: usize) -> String {
    let input = format!(
        "{}|{}|{}|{}",
        date.format("%Y-%m-%d"),
        description,
        amount,
        occurrence
    );
    let hash = blake3::hash(input.as_bytes()).to_hex();
    hash.as_str()[..16].to_string()
}

/// Classify a fresh batch with the user's rules and store it.
/// Ids already present for the user are left untouched.
pub fn import_transactions<D: Database>(
    db: &mut D,
    user: &str,
    transactions: Vec<Transaction>,
) -> Result<ImportSummary> {
    let total = transactions.len();
    let mut seen = HashSet::with_capacity(total);
    let mut fresh = Vec::with_capacity(total);
    for transaction in transactions {
        if seen.insert(transaction.id.clone())
            && db.get_transaction(user, &transaction.id)?.is_none()
        {
            fresh.push(transaction);
        }
    }

    let rule_set = db.get_or_create_rule_set(user)?;
    let classified = classify_all(fresh, &rule_set);
    let inserted = db.add_transactions(user, &classified)?;
    // Counts cover the rows stored by this call, not rows seen before.
    let uncategorized = classified.iter().filter(|t| t.is_uncategorized()).count();

    let summary = ImportSummary {
        total,
        inserted,
        duplicates: total - inserted,
        categorized: classified.len() - uncategorized,
        uncategorized,
    };
    log::info!(
        "Imported {} new transactions for {} ({} duplicates, {} uncategorized)",
        summary.inserted,
        user,
        summary.duplicates,
        summary.uncategorized
    );
    Ok(summary)
}

/// Re-run the current rules over transactions that are still uncategorized.
/// Returns how many gained a category.
pub fn reclassify_uncategorized<D: Database>(db: &mut D, user: &str) -> Result<usize> {
    let rule_set = db.get_or_create_rule_set(user)?;
    let pending = db.list_uncategorized(user, None)?;

    let mut updated = 0;
    for transaction in &pending {
        let category = classify(transaction, &rule_set);
        if !category.is_uncategorized() {
            db.update_transaction_category(user, &transaction.id, category)?;
            log::debug!("{} -> {}", transaction.description, category);
            updated += 1;
        }
    }

    log::info!("Reclassified {} of {} uncategorized transactions", updated, pending.len());
    Ok(updated)
}
