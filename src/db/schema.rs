//! SQL DDL for all BrainBox tables.
//!
//! Defines the `neurons`, `synapses`, `access_log`, `sessions`, and
//! `schema_meta` tables. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization. The CHECK constraints mirror the engine's numeric
//! invariants so that no write path can persist an out-of-range value.

use rusqlite::Connection;

/// All schema DDL statements for BrainBox's core tables.
const SCHEMA_SQL: &str = r#"
-- Memory graph nodes
CREATE TABLE IF NOT EXISTS neurons (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL CHECK(type IN ('file','tool','error','semantic')),
    path TEXT NOT NULL,
    activation REAL NOT NULL DEFAULT 1.0 CHECK(activation >= 0.0 AND activation <= 1.0),
    myelination REAL NOT NULL DEFAULT 0.0 CHECK(myelination >= 0.0 AND myelination <= 0.95),
    access_count INTEGER NOT NULL DEFAULT 0,
    last_accessed TEXT,
    created_at TEXT NOT NULL,
    contexts TEXT NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS idx_neurons_type ON neurons(type);
CREATE INDEX IF NOT EXISTS idx_neurons_myelination ON neurons(myelination);
CREATE INDEX IF NOT EXISTS idx_neurons_activation ON neurons(activation);

-- Directed weighted edges, strengthened by co-access
CREATE TABLE IF NOT EXISTS synapses (
    source_id TEXT NOT NULL REFERENCES neurons(id) ON DELETE CASCADE,
    target_id TEXT NOT NULL REFERENCES neurons(id) ON DELETE CASCADE,
    weight REAL NOT NULL DEFAULT 0.0 CHECK(weight >= 0.0 AND weight <= 1.0),
    co_access_count INTEGER NOT NULL DEFAULT 0,
    last_fired TEXT,
    created_at TEXT NOT NULL,
    PRIMARY KEY (source_id, target_id)
);

CREATE INDEX IF NOT EXISTS idx_synapses_source_weight ON synapses(source_id, weight);
CREATE INDEX IF NOT EXISTS idx_synapses_weight ON synapses(weight);

-- Append-only record of every access (no FK: log rows outlive pruned neurons)
CREATE TABLE IF NOT EXISTS access_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    neuron_id TEXT NOT NULL,
    session_id TEXT,
    query TEXT,
    timestamp TEXT NOT NULL,
    token_cost INTEGER NOT NULL DEFAULT 0,
    access_order INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_access_log_timestamp ON access_log(timestamp);
CREATE INDEX IF NOT EXISTS idx_access_log_neuron ON access_log(neuron_id);

-- One row per engine open
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    started_at TEXT NOT NULL,
    ended_at TEXT,
    total_accesses INTEGER NOT NULL DEFAULT 0,
    tokens_used INTEGER NOT NULL DEFAULT 0,
    tokens_saved INTEGER NOT NULL DEFAULT 0
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
