//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Scoring and reporting code calls store methods and never runs SQL.

use crate::error::{ChurnError, ChurnResult};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

mod assessment;
mod report;

pub use assessment::StoredAssessment;

pub struct ChurnStore {
    conn: Connection,
    path: Option<String>, // None for :memory:
}

impl ChurnStore {
    pub fn open(path: &str) -> ChurnResult<Self> {
        if path == ":memory:" {
            return Self::in_memory();
        }
        let conn = Connection::open(path)?;
        // WAL is a no-op for some targets; ignore the result.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ChurnResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// `None` for in-memory stores.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order. Safe to run repeatedly.
    pub fn migrate(&self) -> ChurnResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_scoring.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_reports.sql"))?;
        Ok(())
    }

    /// Run `f` inside one transaction. Commits when `f` returns `Ok`;
    /// any error rolls back every write `f` made.
    pub fn with_transaction<T>(&self, f: impl FnOnce(&Self) -> ChurnResult<T>) -> ChurnResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }
}

pub(crate) fn parse_timestamp(field: &'static str, raw: &str) -> ChurnResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ChurnError::invalid(field, format!("bad timestamp '{raw}': {e}")))
}
