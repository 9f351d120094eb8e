pub mod profiles;
pub mod rule_sets;
pub mod schema;
pub mod transactions;

use crate::categorize::category::Category;
use crate::categorize::rules::RuleSet;
use crate::error::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use profiles::Profile;
pub use transactions::CategoryStats;

/// A bank transaction as the categorizer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    /// Negative = money out, positive = money in
    pub amount: f64,
    #[serde(default)]
    pub category: Category,
}

impl Transaction {
    /// New, not yet categorized transaction.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            description: description.into(),
            amount,
            category: Category::Uncategorized,
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.is_uncategorized()
    }
}

/// Storage for rule sets, transactions and profiles, keyed by user.
pub trait Database {
    fn initialize(&mut self) -> Result<()>;
    fn get_rule_set(&self, user: &str) -> Result<Option<RuleSet>>;
    fn get_or_create_rule_set(&mut self, user: &str) -> Result<RuleSet>;
    fn save_rule_set(&mut self, user: &str, rule_set: &RuleSet) -> Result<()>;
    fn add_transactions(&mut self, user: &str, transactions: &[Transaction]) -> Result<usize>;
    fn get_transaction(&self, user: &str, id: &str) -> Result<Option<Transaction>>;
    fn list_transactions(&self, user: &str) -> Result<Vec<Transaction>>;
    fn list_uncategorized(&self, user: &str, limit: Option<u32>) -> Result<Vec<Transaction>>;
    fn update_transaction_category(&mut self, user: &str, id: &str, category: Category) -> Result<()>;
    fn get_or_create_profile(&mut self, user: &str) -> Result<Profile>;
    fn save_profile(&mut self, user: &str, profile: &Profile) -> Result<()>;
}

pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Database for SqliteDatabase {
    fn initialize(&mut self) -> Result<()> {
        schema::initialize_schema(&self.conn)
    }

    fn get_rule_set(&self, user: &str) -> Result<Option<RuleSet>> {
        rule_sets::get_rule_set(&self.conn, user)
    }

    fn get_or_create_rule_set(&mut self, user: &str) -> Result<RuleSet> {
        rule_sets::get_or_create_rule_set(&self.conn, user)
    }

    fn save_rule_set(&mut self, user: &str, rule_set: &RuleSet) -> Result<()> {
        rule_sets::save_rule_set(&self.conn, user, rule_set)
    }

    fn add_transactions(&mut self, user: &str, transactions: &[Transaction]) -> Result<usize> {
        transactions::add_transactions(&mut self.conn, user, transactions)
    }

    fn get_transaction(&self, user: &str, id: &str) -> Result<Option<Transaction>> {
        transactions::get_transaction(&self.conn, user, id)
    }

    fn list_transactions(&self, user: &str) -> Result<Vec<Transaction>> {
        transactions::list_transactions(&self.conn, user)
    }

    fn list_uncategorized(&self, user: &str, limit: Option<u32>) -> Result<Vec<Transaction>> {
        transactions::list_uncategorized(&self.conn, user, limit)
    }

    fn update_transaction_category(&mut self, user: &str, id: &str, category: Category) -> Result<()> {
        transactions::update_transaction_category(&self.conn, user, id, category)
    }

    fn get_or_create_profile(&mut self, user: &str) -> Result<Profile> {
        profiles::get_or_create_profile(&self.conn, user)
    }

    fn save_profile(&mut self, user: &str, profile: &Profile) -> Result<()> {
        profiles::save_profile(&self.conn, user, profile)
    }
}
