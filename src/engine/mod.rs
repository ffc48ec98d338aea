//! Core memory engine — recording, recall, decay, sessions, and statistics.
//!
//! [`BrainBox`] is the single entry point. It owns the store handle, the
//! in-memory co-access window, and the per-process access counter, and
//! delegates each operation to a focused submodule: the write path
//! ([`record`]), the read path ([`recall`]), lifecycle management ([`decay`]),
//! session bookkeeping ([`session`]), and statistics ([`stats`]). Type
//! definitions live in [`types`]; the window in [`window`].
//!
//! The engine is single-writer and synchronous; callers serialize their own
//! calls or wrap the engine in a mutex.

pub mod decay;
pub mod recall;
pub mod record;
pub mod session;
pub mod stats;
pub mod types;
pub mod window;

use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub use types::{
    ActivationPath, BrainBoxStats, DecayResult, Neuron, NeuronType, RecallResult, Synapse,
};
pub use window::CoAccessWindow;

use crate::db;

// ── Tuning constants ─────────────────────────────────────────────────────────
// These are engine compile-time constants, not configuration.

/// Hebbian learning rate: base step applied per co-access.
pub const LEARNING_RATE: f64 = 0.1;
/// Myelination gained per access, applied as `m ← m + rate·(1−m)`.
pub const MYELIN_RATE: f64 = 0.02;
/// Asymptotic ceiling for myelination.
pub const MYELIN_MAX: f64 = 0.95;
/// Maximum entries in the co-access window.
pub const CO_ACCESS_WINDOW_SIZE: usize = 10;
/// Maximum distinct context strings retained per neuron.
pub const MAX_CONTEXTS: usize = 20;

/// Minimum confidence for a Phase-1 or Phase-2 recall result.
pub const CONFIDENCE_GATE: f64 = 0.4;
/// Minimum synapse weight followed during spreading activation.
pub const SPREAD_WEIGHT_FLOOR: f64 = 0.3;
/// Minimum confidence for a myelinated-fallback result.
pub const MYELINATED_GATE: f64 = 0.15;
/// Per-keyword candidate fetch limit in Phase 1.
pub const DIRECT_MATCH_LIMIT: usize = 10;
/// Per-seed synapse fetch limit in Phase 2.
pub const SPREAD_FANOUT_LIMIT: usize = 10;
/// Recency half-window for confidence scoring: one week in milliseconds.
pub const RECENCY_WINDOW_MS: f64 = 168.0 * 3_600_000.0;

/// Per-cycle multiplicative loss of activation.
pub const ACTIVATION_DECAY_RATE: f64 = 0.15;
/// Per-cycle multiplicative loss of myelination.
pub const MYELIN_DECAY_RATE: f64 = 0.005;
/// Per-cycle multiplicative loss of synapse weight.
pub const SYNAPSE_DECAY_RATE: f64 = 0.02;
/// Synapses below this weight are pruned after decay.
pub const SYNAPSE_PRUNE_THRESHOLD: f64 = 0.05;
/// Neurons below these activation/myelination floors with fewer than
/// [`NEURON_PRUNE_ACCESS_COUNT`] accesses are pruned after decay.
pub const NEURON_PRUNE_ACTIVATION: f64 = 0.01;
pub const NEURON_PRUNE_MYELINATION: f64 = 0.01;
pub const NEURON_PRUNE_ACCESS_COUNT: u32 = 2;

/// Neurons above this myelination count as superhighways.
pub const SUPERHIGHWAY_THRESHOLD: f64 = 0.5;

// ── Engine facade ────────────────────────────────────────────────────────────

/// The Hebbian memory engine: a persistent graph of neurons and synapses
/// behind a single SQLite file.
///
/// One instance assumes sole write ownership of its database file. The store
/// handle can be [`close`](Self::close)d at any time; any later operation
/// transparently reopens it.
pub struct BrainBox {
    db_path: PathBuf,
    conn: Option<Connection>,
    window: CoAccessWindow,
    /// Per-process monotonic counter for intra-timestamp ordering.
    access_order: i64,
    session_id: String,
    recall_requests: u64,
    recall_hits: u64,
}

impl BrainBox {
    /// Open (or create) the engine over the database at `db_path`.
    ///
    /// Creates a fresh session row and reconstructs the co-access window from
    /// the last hour of the access log.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        let conn = db::open_database(&db_path)?;
        let session_id = session::start_session(&conn)?;
        let window = CoAccessWindow::seed_from_log(&conn)?;

        tracing::info!(session_id = %session_id, window = window.len(), "engine opened");
        Ok(Self {
            db_path,
            conn: Some(conn),
            window,
            access_order: 0,
            session_id,
            recall_requests: 0,
            recall_hits: 0,
        })
    }

    /// Record an access to an entity, creating its neuron on first sight.
    ///
    /// An empty `path` is ignored. Strengthens synapses against every entry
    /// in the co-access window, then pushes this access into the window.
    pub fn record(
        &mut self,
        path: &str,
        neuron_type: NeuronType,
        context: Option<&str>,
    ) -> Result<()> {
        if path.is_empty() {
            tracing::warn!("ignoring record with empty path");
            return Ok(());
        }

        self.ensure_open()?;
        self.access_order += 1;
        let conn = self.conn.as_mut().expect("store was just ensured open");
        record::record_access(
            conn,
            &mut self.window,
            &self.session_id,
            self.access_order,
            path,
            neuron_type,
            context,
        )
    }

    /// Record a free-text fact as a semantic neuron.
    pub fn record_semantic(&mut self, text: &str, context: Option<&str>) -> Result<()> {
        self.record(text, NeuronType::Semantic, context)
    }

    /// Retrieve up to `limit` ranked recall candidates for a query.
    ///
    /// A zero `limit` returns an empty list.
    pub fn recall(
        &mut self,
        query: &str,
        neuron_type: NeuronType,
        limit: usize,
    ) -> Result<Vec<RecallResult>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        self.ensure_open()?;
        let conn = self.conn.as_ref().expect("store was just ensured open");
        let results = recall::recall_query(conn, query, neuron_type, limit)?;

        self.recall_requests += 1;
        let tokens_saved = if results.is_empty() {
            0
        } else {
            self.recall_hits += 1;
            results.iter().map(|r| r.neuron.neuron_type.token_cost()).sum()
        };
        let hit_rate = self.recall_hits as f64 / self.recall_requests as f64;
        session::note_recall(conn, &self.session_id, tokens_saved, hit_rate)?;

        Ok(results)
    }

    /// Run one decay/pruning cycle over the whole graph.
    pub fn decay(&mut self) -> Result<DecayResult> {
        self.ensure_open()?;
        let conn = self.conn.as_mut().expect("store was just ensured open");
        decay::run_decay(conn)
    }

    /// Aggregate graph statistics.
    pub fn stats(&mut self) -> Result<BrainBoxStats> {
        self.ensure_open()?;
        let conn = self.conn.as_ref().expect("store was just ensured open");
        stats::graph_stats(conn)
    }

    /// Enumerate the most trusted neurons (myelination above 0.5).
    pub fn superhighways(&mut self, limit: usize) -> Result<Vec<Neuron>> {
        self.ensure_open()?;
        let conn = self.conn.as_ref().expect("store was just ensured open");
        stats::superhighways(conn, limit)
    }

    /// Enumerate the strongest synapses in the graph.
    pub fn strongest_synapses(&mut self, limit: usize) -> Result<Vec<Synapse>> {
        self.ensure_open()?;
        let conn = self.conn.as_ref().expect("store was just ensured open");
        stats::strongest_synapses(conn, limit)
    }

    /// Close the store handle. Idempotent; later operations reopen lazily.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            session::end_session(&conn, &self.session_id)?;
            tracing::info!(session_id = %self.session_id, "engine closed");
        }
        Ok(())
    }

    /// Whether the store handle is currently open.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// The id of the session this engine instance opened.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Reopen the store handle if it was closed.
    fn ensure_open(&mut self) -> Result<()> {
        if self.conn.is_none() {
            tracing::debug!(path = %self.db_path.display(), "store handle was closed, reopening");
            self.conn = Some(db::open_database(&self.db_path)?);
        }
        Ok(())
    }
}
