//! Write path — neuron upsert, access logging, and Hebbian strengthening.
//!
//! [`record_access`] is the single entry point. It runs the full pipeline
//! inside a transaction: upsert the neuron (full activation, advanced
//! myelination, appended context), append an access-log row, strengthen
//! synapses in both directions against the co-access window, and bump the
//! session counters. The window itself is only updated after the transaction
//! commits.

use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use super::session;
use super::types::{decode_contexts, NeuronType};
use super::window::CoAccessWindow;
use super::{LEARNING_RATE, MAX_CONTEXTS, MYELIN_MAX, MYELIN_RATE};

/// Full write path for one access. `access_order` is the engine's per-process
/// monotonic counter value for this access.
pub(crate) fn record_access(
    conn: &mut Connection,
    window: &mut CoAccessWindow,
    session_id: &str,
    access_order: i64,
    path: &str,
    neuron_type: NeuronType,
    context: Option<&str>,
) -> Result<()> {
    let id = format!("{}:{}", neuron_type.as_str(), path);
    let now = Utc::now().to_rfc3339();

    let tx = conn.transaction()?;

    // 1. Upsert the neuron: activation back to 1.0, myelination advanced,
    //    context appended.
    upsert_neuron(&tx, &id, neuron_type, path, context, &now)?;

    // 2. Append to the access log.
    let token_cost = neuron_type.token_cost();
    tx.execute(
        "INSERT INTO access_log (neuron_id, session_id, query, timestamp, token_cost, access_order) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, session_id, context, now, token_cost, access_order],
    )?;

    // 3. Hebbian step: strengthen synapses against everything in the window.
    strengthen_against_window(&tx, &id, window, &now)?;

    // 4. Session counters.
    session::bump_access(&tx, session_id, token_cost)?;

    tx.commit()?;

    // 5. Window update happens only after the write is durable.
    window.touch(&id);

    tracing::debug!(neuron_id = %id, "access recorded");
    Ok(())
}

/// Advance myelination by one access: `m ← min(m + rate·(1−m), ceiling)`.
pub(crate) fn advance_myelination(myelination: f64) -> f64 {
    (myelination + MYELIN_RATE * (1.0 - myelination)).min(MYELIN_MAX)
}

/// Insert or update the neuron row for this access.
fn upsert_neuron(
    tx: &Transaction,
    id: &str,
    neuron_type: NeuronType,
    path: &str,
    context: Option<&str>,
    now: &str,
) -> Result<()> {
    let existing: Option<(f64, String)> = tx
        .query_row(
            "SELECT myelination, contexts FROM neurons WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match existing {
        Some((myelination, raw_contexts)) => {
            let mut contexts = decode_contexts(id, &raw_contexts);
            push_context(&mut contexts, context);
            let contexts_json = serde_json::to_string(&contexts)?;

            tx.execute(
                "UPDATE neurons SET activation = 1.0, myelination = ?1, \
                 access_count = access_count + 1, last_accessed = ?2, contexts = ?3 \
                 WHERE id = ?4",
                params![advance_myelination(myelination), now, contexts_json, id],
            )?;
        }
        None => {
            let mut contexts = Vec::new();
            push_context(&mut contexts, context);
            let contexts_json = serde_json::to_string(&contexts)?;

            tx.execute(
                "INSERT INTO neurons (id, type, path, activation, myelination, access_count, \
                 last_accessed, created_at, contexts) \
                 VALUES (?1, ?2, ?3, 1.0, ?4, 1, ?5, ?5, ?6)",
                params![
                    id,
                    neuron_type.as_str(),
                    path,
                    advance_myelination(0.0),
                    now,
                    contexts_json,
                ],
            )?;
        }
    }

    Ok(())
}

/// Append a context string, suppressing duplicates and trimming to the
/// trailing [`MAX_CONTEXTS`] entries.
fn push_context(contexts: &mut Vec<String>, context: Option<&str>) {
    let Some(context) = context else { return };
    if context.is_empty() || contexts.iter().any(|c| c == context) {
        return;
    }
    contexts.push(context.to_string());
    if contexts.len() > MAX_CONTEXTS {
        let excess = contexts.len() - MAX_CONTEXTS;
        contexts.drain(..excess);
    }
}

/// Fire synapses between the new access and every window entry, in both
/// directions. The position factor rewards recency: the entry at window
/// index `i` (oldest-first) contributes `Δ = LEARNING_RATE · (i+1)/|window|`.
fn strengthen_against_window(
    tx: &Transaction,
    id: &str,
    window: &CoAccessWindow,
    now: &str,
) -> Result<()> {
    if window.is_empty() {
        return Ok(());
    }

    let len = window.len() as f64;
    let mut stmt = tx.prepare_cached(
        "INSERT INTO synapses (source_id, target_id, weight, co_access_count, last_fired, created_at) \
         VALUES (?1, ?2, ?3, 1, ?4, ?4) \
         ON CONFLICT(source_id, target_id) DO UPDATE SET \
             weight = MIN(weight + ?3 * (1.0 - weight), 1.0), \
             co_access_count = co_access_count + 1, \
             last_fired = ?4",
    )?;

    for (i, recent_id) in window.iter().enumerate() {
        if recent_id == id {
            continue;
        }
        let delta = LEARNING_RATE * (i as f64 + 1.0) / len;
        stmt.execute(params![id, recent_id, delta, now])?;
        stmt.execute(params![recent_id, id, delta, now])?;
    }

    Ok(())
}
