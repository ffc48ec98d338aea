//! Core graph type definitions.
//!
//! Defines [`NeuronType`] (the four remembered-entity categories), [`Neuron`]
//! (a graph node), [`Synapse`] (a directed weighted edge), and the
//! [`RecallResult`] records returned by the recall engine.

use serde::{Deserialize, Serialize};

/// The four kinds of remembered entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronType {
    /// A filesystem path touched by a tool call.
    File,
    /// A tool name.
    Tool,
    /// An error signature recognized in command output.
    Error,
    /// A free-text fact captured from conversation.
    Semantic,
}

impl NeuronType {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Tool => "tool",
            Self::Error => "error",
            Self::Semantic => "semantic",
        }
    }

    /// Heuristic cost in tokens of re-reading this entity from scratch.
    /// Files are assumed to be far more expensive than tool or fact lookups.
    pub fn token_cost(&self) -> i64 {
        match self {
            Self::File => 1500,
            Self::Tool | Self::Error | Self::Semantic => 500,
        }
    }
}

impl std::fmt::Display for NeuronType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NeuronType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "tool" => Ok(Self::Tool),
            "error" => Ok(Self::Error),
            "semantic" => Ok(Self::Semantic),
            _ => Err(format!("unknown neuron type: {s}")),
        }
    }
}

impl rusqlite::types::ToSql for NeuronType {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
    }
}

impl rusqlite::types::FromSql for NeuronType {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| rusqlite::types::FromSqlError::InvalidType)
    }
}

/// A node in the memory graph, matching the `neurons` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neuron {
    /// Composite primary key: `"<type>:<path>"`.
    pub id: String,
    /// Kind of remembered entity.
    #[serde(rename = "type")]
    pub neuron_type: NeuronType,
    /// Natural key: filesystem path, tool name, error signature, or fact text.
    pub path: String,
    /// Short-term excitement in `[0.0, 1.0]`; set to 1.0 on access, decays fast.
    pub activation: f64,
    /// Long-term trust in `[0.0, 0.95]`; grows asymptotically with use, decays slowly.
    pub myelination: f64,
    /// Number of times this neuron has been recorded.
    pub access_count: u32,
    /// ISO 8601 timestamp of the last access, or `None` if never accessed.
    pub last_accessed: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// Recent query/context strings, newest last, capped at 20 distinct entries.
    pub contexts: Vec<String>,
}

/// Column list matching [`Neuron::from_row`]'s positional decoding.
pub(crate) const NEURON_COLUMNS: &str =
    "id, type, path, activation, myelination, access_count, last_accessed, created_at, contexts";

impl Neuron {
    /// Decode a row selected with [`NEURON_COLUMNS`].
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let raw_contexts: String = row.get(8)?;
        Ok(Self {
            neuron_type: row.get(1)?,
            path: row.get(2)?,
            activation: row.get(3)?,
            myelination: row.get(4)?,
            access_count: row.get(5)?,
            last_accessed: row.get(6)?,
            created_at: row.get(7)?,
            contexts: decode_contexts(&id, &raw_contexts),
            id,
        })
    }
}

/// Decode a stored contexts blob.
///
/// A blob that fails to parse is treated as empty rather than failing the
/// operation; the next upsert overwrites it with a clean encoding.
pub(crate) fn decode_contexts(id: &str, raw: &str) -> Vec<String> {
    match serde_json::from_str(raw) {
        Ok(contexts) => contexts,
        Err(e) => {
            tracing::warn!(neuron_id = %id, error = %e, "undecodable contexts blob, treating as empty");
            Vec::new()
        }
    }
}

/// A directed weighted edge between two neurons, matching the `synapses` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synapse {
    pub source_id: String,
    pub target_id: String,
    /// Connection strength in `[0.0, 1.0]`, strengthened by co-access.
    pub weight: f64,
    /// Number of times the two endpoints were accessed in temporal proximity.
    pub co_access_count: u32,
    /// ISO 8601 timestamp of the last strengthening, or `None`.
    pub last_fired: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// Column list matching [`Synapse::from_row`]'s positional decoding.
pub(crate) const SYNAPSE_COLUMNS: &str =
    "source_id, target_id, weight, co_access_count, last_fired, created_at";

impl Synapse {
    /// Decode a row selected with [`SYNAPSE_COLUMNS`].
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            source_id: row.get(0)?,
            target_id: row.get(1)?,
            weight: row.get(2)?,
            co_access_count: row.get(3)?,
            last_fired: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// How a recall result was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationPath {
    /// Keyword match against the neuron's stored contexts.
    Direct,
    /// Reached by 1-hop spreading activation from a direct match.
    Spread,
    /// Surfaced by the high-myelination fallback when matches run out.
    Myelinated,
}

impl ActivationPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Spread => "spread",
            Self::Myelinated => "myelinated",
        }
    }
}

impl std::fmt::Display for ActivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked recall candidate.
#[derive(Debug, Clone, Serialize)]
pub struct RecallResult {
    pub neuron: Neuron,
    /// Confidence score in `[0.0, 1.0]`.
    pub confidence: f64,
    pub activation_path: ActivationPath,
}

/// Aggregate graph statistics.
#[derive(Debug, Serialize)]
pub struct BrainBoxStats {
    pub neuron_count: u64,
    pub synapse_count: u64,
    /// Neurons with myelination above 0.5.
    pub superhighways: u64,
    pub total_accesses: u64,
    pub avg_myelination: f64,
}

/// Counts returned by a decay pass.
#[derive(Debug, Serialize)]
pub struct DecayResult {
    pub pruned_synapses: usize,
    pub pruned_neurons: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn neuron_type_round_trips_through_strings() {
        for t in [
            NeuronType::File,
            NeuronType::Tool,
            NeuronType::Error,
            NeuronType::Semantic,
        ] {
            assert_eq!(NeuronType::from_str(t.as_str()).unwrap(), t);
        }
        assert!(NeuronType::from_str("episodic").is_err());
    }

    #[test]
    fn token_cost_favors_files() {
        assert_eq!(NeuronType::File.token_cost(), 1500);
        assert_eq!(NeuronType::Tool.token_cost(), 500);
        assert_eq!(NeuronType::Error.token_cost(), 500);
        assert_eq!(NeuronType::Semantic.token_cost(), 500);
    }

    #[test]
    fn activation_path_strings() {
        assert_eq!(ActivationPath::Direct.as_str(), "direct");
        assert_eq!(ActivationPath::Spread.as_str(), "spread");
        assert_eq!(ActivationPath::Myelinated.as_str(), "myelinated");
    }
}
