use std::path::Path;

use log::warn;
use rusqlite::{params, Connection};

use crate::keypad::Commit;

/// A single stored calculation. Created once per successful evaluation
/// and immutable afterwards; `id` is assigned by the log on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: i64,
    pub expression: String,
    pub result: String,
    pub timestamp: String,
}

/// Append-only log of finished calculations backed by a SQLite table.
///
/// The log mirrors the in-memory state for display and recall; it is never
/// the source of truth for the live calculation, so `insert` failures are
/// logged and swallowed instead of being surfaced to the caller.
pub struct HistoryLog {
    conn: Connection,
}

impl HistoryLog {
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS calculation_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                expression TEXT NOT NULL,
                result TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(HistoryLog { conn })
    }

    /// Appends a calculation to the log. A storage failure is logged and
    /// does not interrupt the calculator
    pub fn insert(&self, expression: &str, result: &str) {
        let res = self.conn.execute(
            "INSERT INTO calculation_history (expression, result) VALUES (?1, ?2)",
            params![expression, result],
        );
        if let Err(e) = res {
            warn!("failed to store calculation '{}': {}", expression, e);
        }
    }

    /// Appends the calculation a keypad handed out on a successful equals
    pub fn append(&self, commit: &Commit) {
        self.insert(&commit.expression, &commit.result);
    }

    /// All stored calculations, newest first. The id breaks the tie
    /// between entries stored within the same second
    pub fn query_all(&self) -> rusqlite::Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, expression, result, timestamp FROM calculation_history
             ORDER BY timestamp DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                expression: row.get(1)?,
                result: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;
        rows.collect()
    }

    pub fn delete_by_id(&self, id: i64) -> rusqlite::Result<()> {
        self.conn
            .execute("DELETE FROM calculation_history WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn delete_all(&self) -> rusqlite::Result<()> {
        self.conn.execute("DELETE FROM calculation_history", [])?;
        Ok(())
    }
}
