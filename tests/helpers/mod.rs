#![allow(dead_code)]

use brainbox::db;
use brainbox::engine::BrainBox;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// Path for an on-disk test database inside a temp directory.
pub fn db_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join("brain.db")
}

/// Open an engine over an on-disk database inside a temp directory.
pub fn open_engine(tmp: &TempDir) -> BrainBox {
    BrainBox::open(db_path(tmp)).unwrap()
}

/// Open a raw connection to an engine's database for direct inspection.
pub fn raw_conn(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    conn
}

/// Count rows in a table.
pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

/// Fetch a synapse weight, if the edge exists.
pub fn synapse_weight(conn: &Connection, source: &str, target: &str) -> Option<f64> {
    use rusqlite::OptionalExtension;
    conn.query_row(
        "SELECT weight FROM synapses WHERE source_id = ?1 AND target_id = ?2",
        rusqlite::params![source, target],
        |row| row.get(0),
    )
    .optional()
    .unwrap()
}
