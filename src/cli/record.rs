//! CLI `record` and `remember` commands — feed accesses into the graph.
//!
//! Recording is best-effort at this boundary: a failed write is logged and
//! swallowed so a memory hiccup never breaks the calling hook.

use anyhow::Result;

use crate::config::BrainBoxConfig;
use crate::engine::{BrainBox, NeuronType};

/// Record an access to a file, tool, or error signature.
pub fn record(
    config: &BrainBoxConfig,
    path: &str,
    type_str: &str,
    context: Option<&str>,
) -> Result<()> {
    let Ok(neuron_type) = type_str.parse::<NeuronType>() else {
        tracing::warn!(neuron_type = type_str, "unknown neuron type, ignoring record");
        return Ok(());
    };

    let mut engine = BrainBox::open(config.resolved_db_path())?;
    if let Err(e) = engine.record(path, neuron_type, context) {
        tracing::warn!(error = %e, "record failed; memory is best-effort");
    }
    engine.close()
}

/// Record a free-text fact as a semantic neuron.
pub fn remember(config: &BrainBoxConfig, text: &str, context: Option<&str>) -> Result<()> {
    let mut engine = BrainBox::open(config.resolved_db_path())?;
    if let Err(e) = engine.record_semantic(text, context) {
        tracing::warn!(error = %e, "record failed; memory is best-effort");
    }
    engine.close()
}
