//! Connection bootstrap.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a 5 s busy timeout.
//! - Returned connections have every migration applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult, StoreLocation};
use crate::logging::events;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the store file at `path` and migrates it.
///
/// # Side effects
/// - Emits `db_open` events with `mode=file`, duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(StoreLocation::File(path.to_path_buf()), || {
        Connection::open(path)
    })
}

/// Opens a private in-memory store and migrates it. Used by tests and the CLI.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(StoreLocation::Memory, Connection::open_in_memory)
}

fn open_with(
    location: StoreLocation,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = location.mode();
    info!(
        "event={} module=db status=start mode={mode}",
        events::DB_OPEN
    );

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(source) => {
            let err = DbError::Open { location, source };
            log_open_failure(mode, started_at, "db_open_failed", &err);
            return Err(err);
        }
    };
    if let Err(err) = bootstrap_connection(&mut conn, &location) {
        log_open_failure(mode, started_at, "db_bootstrap_failed", &err);
        return Err(err);
    }

    info!(
        "event={} module=db status=ok mode={} duration_ms={}",
        events::DB_OPEN,
        mode,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn log_open_failure(mode: &str, started_at: Instant, error_code: &str, err: &DbError) {
    error!(
        "event={} module=db status=error mode={} duration_ms={} error_code={} error={}",
        events::DB_OPEN,
        mode,
        started_at.elapsed().as_millis(),
        error_code,
        err
    );
}

fn bootstrap_connection(conn: &mut Connection, location: &StoreLocation) -> DbResult<()> {
    let configure = |source| DbError::Bootstrap {
        location: location.clone(),
        source,
    };
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(configure)?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(configure)?;
    apply_migrations(conn)
}
