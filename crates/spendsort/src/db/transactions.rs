use crate::categorize::category::Category;
use crate::db::Transaction;
use crate::error::{Result, SpendsortError};
use chrono::{NaiveDate, Utc};
use rusqlite::{named_params, Connection, OptionalExtension};

const SELECT_COLUMNS: &str = "SELECT id, date, description, amount, category FROM transactions";

/// Insert transactions for `user`, ignoring ids that are already stored.
/// Returns how many rows were new.
pub fn add_transactions(conn: &mut Connection, user: &str, transactions: &[Transaction]) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO transactions (user, id, date, description, amount, category)
             VALUES (:user, :id, :date, :description, :amount, :category)",
        )?;

        for transaction in transactions {
            inserted += stmt.execute(named_params! {
                ":user": user,
                ":id": &transaction.id,
                ":date": transaction.date.format("%Y-%m-%d").to_string(),
                ":description": &transaction.description,
                ":amount": transaction.amount,
                ":category": transaction.category.as_str(),
            })?;
        }
    }
    tx.commit()?;

    Ok(inserted)
}

pub fn get_transaction(conn: &Connection, user: &str, id: &str) -> Result<Option<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} WHERE user = ?1 AND id = ?2", SELECT_COLUMNS))?;
    let transaction = stmt.query_row((user, id), parse_transaction_row).optional()?;
    Ok(transaction)
}

/// All of the user's transactions, newest first.
pub fn list_transactions(conn: &Connection, user: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE user = ?1 ORDER BY date DESC, id",
        SELECT_COLUMNS
    ))?;

    let transactions = stmt
        .query_map([user], parse_transaction_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(transactions)
}

/// Transactions still awaiting a category, oldest first so the review queue
/// runs in statement order.
pub fn list_uncategorized(conn: &Connection, user: &str, limit: Option<u32>) -> Result<Vec<Transaction>> {
    let mut query = format!(
        "{} WHERE user = ?1 AND category = ?2 ORDER BY date ASC, id",
        SELECT_COLUMNS
    );
    if let Some(limit) = limit {
        query.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&query)?;
    let transactions = stmt
        .query_map((user, Category::Uncategorized.as_str()), parse_transaction_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(transactions)
}

pub fn update_transaction_category(
    conn: &Connection,
    user: &str,
    id: &str,
    category: Category,
) -> Result<()> {
    let rows = conn.execute(
        "UPDATE transactions SET category = ?1, updated_at = ?2 WHERE user = ?3 AND id = ?4",
        (category.as_str(), Utc::now().to_rfc3339(), user, id),
    )?;
    if rows == 0 {
        return Err(SpendsortError::TransactionNotFound(id.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: Category,
    pub transaction_count: i64,
    pub total_amount: f64,
}

/// Count and absolute amount per category for one user.
pub fn get_category_stats(conn: &Connection, user: &str) -> Result<Vec<CategoryStats>> {
    let mut stmt = conn.prepare(
        "SELECT category, COUNT(*) as transaction_count, COALESCE(SUM(ABS(amount)), 0) as total_amount
         FROM transactions
         WHERE user = ?1
         GROUP BY category
         ORDER BY total_amount DESC",
    )?;

    let rows = stmt
        .query_map([user], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(category, transaction_count, total_amount)| {
            Ok(CategoryStats {
                category: category.parse()?,
                transaction_count,
                total_amount,
            })
        })
        .collect()
}

fn parse_transaction_row(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let date: String = row.get(1)?;
    let category: String = row.get(4)?;

    Ok(Transaction {
        id: row.get(0)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: category.parse().map_err(|e: SpendsortError| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}
