//! SQLite store bootstrap for the planner snapshot.
//!
//! # Responsibility
//! - Open file-backed or in-memory connections with required pragmas.
//! - Bring the schema up to date before any snapshot is read or written.
//! - Say which store and which migration failed when bootstrap goes wrong.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A store written by a newer binary is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Where a planner store connection points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

impl StoreLocation {
    /// Short label used as `mode=` in `db_open` events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

impl Display for StoreLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "planner store `{}`", path.display()),
            Self::Memory => f.write_str("in-memory planner store"),
        }
    }
}

#[derive(Debug)]
pub enum DbError {
    /// The store file could not be opened or created.
    Open {
        location: StoreLocation,
        source: rusqlite::Error,
    },
    /// Connection pragmas could not be applied.
    Bootstrap {
        location: StoreLocation,
        source: rusqlite::Error,
    },
    /// A schema migration failed and was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => write!(f, "failed to open {location}: {source}"),
            Self::Bootstrap { location, source } => {
                write!(f, "failed to configure {location}: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "planner store migration {version} failed: {source}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "planner store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Bootstrap { source, .. }
            | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
