pub mod categorize;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod report;

pub use categorize::{
    classify, classify_all, learn, normalize_keyword, Category, Decision, DecisionSource,
    LearnOutcome, ReviewSession, ReviewSummary, Rule, RuleSet, Swipe, TerminalReviewer,
};
pub use config::{Config, Settings};
pub use db::{CategoryStats, Database, Profile, SqliteDatabase, Transaction};
pub use error::{Result, SpendsortError};
pub use ingest::{
    import_transactions, parse_csv_file, parse_csv_reader, reclassify_uncategorized,
    ImportSummary, ParseStats, ParsedCsv,
};
pub use report::{
    category_totals, goal_progress, monthly_totals, render_category_totals, CategoryTotal,
    MonthlyTotal,
};
