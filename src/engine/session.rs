//! Session lifecycle and per-session counters.
//!
//! One `sessions` row is created per engine open. `record` bumps the access
//! and token counters; recall outcomes feed `tokens_saved` and `hit_rate`;
//! `close` stamps `ended_at`.

use anyhow::Result;
use rusqlite::{params, Connection};

/// Create a new session row and return its id.
pub(crate) fn start_session(conn: &Connection) -> Result<String> {
    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO sessions (id, started_at) VALUES (?1, ?2)",
        params![id, now],
    )?;

    tracing::debug!(session_id = %id, "session started");
    Ok(id)
}

/// Count one access against the session.
pub(crate) fn bump_access(conn: &Connection, session_id: &str, token_cost: i64) -> Result<()> {
    conn.execute(
        "UPDATE sessions SET total_accesses = total_accesses + 1, \
         tokens_used = tokens_used + ?1 WHERE id = ?2",
        params![token_cost, session_id],
    )?;
    Ok(())
}

/// Fold a recall outcome into the session counters.
///
/// A hit (at least one result) credits the heuristic token cost of the
/// returned neurons as savings; the hit rate is refreshed either way.
pub(crate) fn note_recall(
    conn: &Connection,
    session_id: &str,
    tokens_saved: i64,
    hit_rate: f64,
) -> Result<()> {
    conn.execute(
        "UPDATE sessions SET tokens_saved = tokens_saved + ?1, hit_rate = ?2 WHERE id = ?3",
        params![tokens_saved, hit_rate, session_id],
    )?;
    Ok(())
}

/// Stamp the session's end time.
pub(crate) fn end_session(conn: &Connection, session_id: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "UPDATE sessions SET ended_at = ?1 WHERE id = ?2",
        params![now, session_id],
    )?;
    Ok(())
}
