#![allow(dead_code)]

use chrono::NaiveDate;
use spendsort_lib::{Database, Decision, DecisionSource, Result, SqliteDatabase, Transaction};
use std::collections::VecDeque;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestFixture {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: SqliteDatabase,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let db_path = temp_dir.path().join("test.db");
        let mut db = SqliteDatabase::open(&db_path)?;
        db.initialize()?;

        Ok(Self {
            temp_dir,
            db_path,
            db,
        })
    }

    pub fn db_mut(&mut self) -> &mut SqliteDatabase {
        &mut self.db
    }

    pub fn db(&self) -> &SqliteDatabase {
        &self.db
    }

    /// Write `content` into the fixture directory and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Open a second connection to the same database file.
    pub fn reopen(&self) -> Result<SqliteDatabase> {
        let mut db = SqliteDatabase::open(&self.db_path)?;
        db.initialize()?;
        Ok(db)
    }
}

pub fn setup_test_fixture() -> Result<TestFixture> {
    TestFixture::new()
}

pub fn txn(id: &str, date: &str, description: &str, amount: f64) -> Transaction {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    Transaction::new(id, date, description, amount)
}

/// Answers review prompts from a fixed script, quitting once it runs out.
pub struct ScriptedReviewer {
    decisions: VecDeque<Decision>,
    pub seen: Vec<(String, usize, usize)>,
}

impl ScriptedReviewer {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self {
            decisions: decisions.into(),
            seen: Vec::new(),
        }
    }
}

impl DecisionSource for ScriptedReviewer {
    fn decide(&mut self, transaction: &Transaction, position: usize, total: usize) -> Result<Decision> {
        self.seen
            .push((transaction.description.clone(), position, total));
        Ok(self.decisions.pop_front().unwrap_or(Decision::Quit))
    }
}

pub const BANK_EXPORT: &str = "\
Date,Description,Amount
2024-01-03,STARBUCKS #1234,-5.75
2024-01-04,Trader Joe's #55,-82.40
01/05/2024,Blue Bottle Coffee,-4.50
2024-01-06,Vanguard ETF Purchase,-500.00
2024-01-07,Corner Deli,-11.20
2024-02-01,Corner Deli,-9.80
2024-02-02,Trader Joe's #55,-61.15
";

pub fn user_rules(db: &mut SqliteDatabase, user: &str) -> spendsort_lib::RuleSet {
    db.get_or_create_rule_set(user).unwrap()
}
