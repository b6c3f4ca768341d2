use planner_core::db::migrations::latest_version;
use planner_core::db::{open_db, open_db_in_memory, DbError, StoreLocation};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn opening_same_store_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES ('k', 'v', 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let value: String = conn_second
        .query_row("SELECT value FROM kv_store WHERE key = 'k';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(value, "v");
}

#[test]
fn opening_store_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreachable_store_path_error_names_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("planner.db");

    let err = open_db(&path).unwrap_err();

    match &err {
        DbError::Open { location, .. } | DbError::Bootstrap { location, .. } => {
            assert_eq!(location, &StoreLocation::File(path.clone()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("planner.db"));
    assert!(std::error::Error::source(&err).is_some());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
