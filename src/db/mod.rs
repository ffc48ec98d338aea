pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (or create) the BrainBox database at the given path, with schema
/// initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path).with_context(|| {
        format!(
            "failed to open database at {}. If the file is corrupt, \
             restore from a backup or run `brainbox reset` to start fresh.",
            path.display()
        )
    })?;

    // Enable WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Enable foreign keys (synapses cascade-delete with their endpoints)
    conn.pragma_update(None, "foreign_keys", "ON")?;
    // Wait up to 5 seconds for locks instead of failing immediately
    conn.pragma_update(None, "busy_timeout", "5000")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;

    // Quick integrity check after schema init
    let integrity: String = conn.pragma_query_value(None, "quick_check", |row| row.get(0))?;
    if integrity != "ok" {
        anyhow::bail!(
            "database integrity check failed: {integrity}. \
             Restore from a backup or run `brainbox reset` to start fresh."
        );
    }

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Result of a full database health check.
pub struct HealthReport {
    pub schema_version: u32,
    pub integrity_ok: bool,
    pub integrity_details: String,
    pub neuron_count: i64,
    pub synapse_count: i64,
    pub access_log_count: i64,
    pub session_count: i64,
}

/// Run a comprehensive health check on the database.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version =
        migrations::get_schema_version(conn).context("failed to read schema version")?;

    let integrity_details: String = conn
        .pragma_query_value(None, "integrity_check", |row| row.get(0))
        .context("failed to run integrity check")?;
    let integrity_ok = integrity_details == "ok";

    let neuron_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM neurons", [], |row| row.get(0))
        .unwrap_or(0);

    let synapse_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM synapses", [], |row| row.get(0))
        .unwrap_or(0);

    let access_log_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM access_log", [], |row| row.get(0))
        .unwrap_or(0);

    let session_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
        .unwrap_or(0);

    Ok(HealthReport {
        schema_version,
        integrity_ok,
        integrity_details,
        neuron_count,
        synapse_count,
        access_log_count,
        session_count,
    })
}

/// Open an in-memory database for testing.
#[cfg(test)]
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;
    Ok(conn)
}
