use crate::error::Result;
use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 2;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS rule_sets (
            user            TEXT PRIMARY KEY,
            rules           TEXT NOT NULL,
            last_updated    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS transactions (
            user            TEXT NOT NULL,
            id              TEXT NOT NULL,
            date            TEXT NOT NULL,
            description     TEXT NOT NULL,
            amount          REAL NOT NULL,
            category        TEXT NOT NULL DEFAULT 'uncategorized',
            imported_at     TEXT DEFAULT (datetime('now')),
            updated_at      TEXT,
            PRIMARY KEY (user, id)
        );

        CREATE TABLE IF NOT EXISTS profiles (
            user            TEXT PRIMARY KEY,
            current_assets  REAL NOT NULL DEFAULT 0,
            goal_amount     REAL NOT NULL DEFAULT 1000000,
            updated_at      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(user, category);
        CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(user, date);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i32>>(0)
    })?;
    Ok(version.unwrap_or(0))
}
