//! Graph statistics and the admin surface.

use anyhow::Result;
use rusqlite::{params, Connection};

use super::types::{BrainBoxStats, Neuron, Synapse, NEURON_COLUMNS, SYNAPSE_COLUMNS};
use super::SUPERHIGHWAY_THRESHOLD;

/// Compute aggregate graph statistics.
pub(crate) fn graph_stats(conn: &Connection) -> Result<BrainBoxStats> {
    let neuron_count: i64 = conn.query_row("SELECT COUNT(*) FROM neurons", [], |row| row.get(0))?;

    let synapse_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM synapses", [], |row| row.get(0))?;

    let superhighways: i64 = conn.query_row(
        "SELECT COUNT(*) FROM neurons WHERE myelination > ?1",
        params![SUPERHIGHWAY_THRESHOLD],
        |row| row.get(0),
    )?;

    let total_accesses: i64 =
        conn.query_row("SELECT COUNT(*) FROM access_log", [], |row| row.get(0))?;

    let avg_myelination: f64 = conn.query_row(
        "SELECT COALESCE(AVG(myelination), 0.0) FROM neurons",
        [],
        |row| row.get(0),
    )?;

    Ok(BrainBoxStats {
        neuron_count: neuron_count as u64,
        synapse_count: synapse_count as u64,
        superhighways: superhighways as u64,
        total_accesses: total_accesses as u64,
        avg_myelination,
    })
}

/// Enumerate superhighway neurons, most trusted first.
pub(crate) fn superhighways(conn: &Connection, limit: usize) -> Result<Vec<Neuron>> {
    let sql = format!(
        "SELECT {NEURON_COLUMNS} FROM neurons WHERE myelination > ?1 \
         ORDER BY myelination DESC LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![SUPERHIGHWAY_THRESHOLD, limit as i64], Neuron::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Enumerate the strongest synapses, heaviest first.
pub(crate) fn strongest_synapses(conn: &Connection, limit: usize) -> Result<Vec<Synapse>> {
    let sql = format!(
        "SELECT {SYNAPSE_COLUMNS} FROM synapses ORDER BY weight DESC LIMIT ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![limit as i64], Synapse::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
