//! Key-value repository backing the planner snapshot.
//!
//! # Responsibility
//! - Read, upsert and delete text values under a stable key.
//! - Report transport failures as `RepoError` without panicking.
//!
//! # Invariants
//! - One row per key; a write replaces the previous value in place.
//! - `updated_at` tracks the last write in epoch milliseconds.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Store exists but is not in a usable shape.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid store state: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string storage keyed by name.
pub trait SnapshotRepository {
    fn read_value(&self, key: &str) -> RepoResult<Option<String>>;
    fn write_value(&self, key: &str, value: &str, updated_at_ms: i64) -> RepoResult<()>;
    /// Returns whether a row was removed.
    fn delete_value(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed key-value repository over `kv_store`.
///
/// `C` is either a borrowed `&Connection` for scoped use or an owned
/// `Connection` for a store that lives as long as the process.
pub struct SqliteSnapshotRepository<C: Borrow<Connection>> {
    conn: C,
}

impl<C: Borrow<Connection>> SqliteSnapshotRepository<C> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `InvalidData` when the connection's schema is behind this binary,
    ///   meaning it was not opened through `open_db*`.
    pub fn try_new(conn: C) -> RepoResult<Self> {
        let version = current_version(conn.borrow())?;
        if version < latest_version() {
            return Err(RepoError::InvalidData(format!(
                "schema version {version} is not migrated (expected {})",
                latest_version()
            )));
        }
        Ok(Self { conn })
    }
}

impl<C: Borrow<Connection>> SqliteSnapshotRepository<C> {
    fn conn(&self) -> &Connection {
        self.conn.borrow()
    }
}

impl<C: Borrow<Connection>> SnapshotRepository for SqliteSnapshotRepository<C> {
    fn read_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_value(&self, key: &str, value: &str, updated_at_ms: i64) -> RepoResult<()> {
        self.conn().execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, updated_at_ms],
        )?;
        Ok(())
    }

    fn delete_value(&self, key: &str) -> RepoResult<bool> {
        let removed = self
            .conn()
            .execute("DELETE FROM kv_store WHERE key = ?1;", params![key])?;
        Ok(removed > 0)
    }
}
