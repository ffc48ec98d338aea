//! On-demand decay and pruning.
//!
//! One transactional pass: multiplicative decay of activation, myelination,
//! and synapse weight, then deletion of sub-threshold synapses and of neurons
//! that never earned their keep. Synapses attached to a pruned neuron go with
//! it via the foreign-key cascade.

use anyhow::Result;
use rusqlite::{params, Connection};

use super::types::DecayResult;
use super::{
    ACTIVATION_DECAY_RATE, MYELIN_DECAY_RATE, NEURON_PRUNE_ACCESS_COUNT,
    NEURON_PRUNE_ACTIVATION, NEURON_PRUNE_MYELINATION, SYNAPSE_DECAY_RATE,
    SYNAPSE_PRUNE_THRESHOLD,
};

/// Apply one decay cycle to the whole graph.
pub(crate) fn run_decay(conn: &mut Connection) -> Result<DecayResult> {
    let tx = conn.transaction()?;

    tx.execute(
        "UPDATE neurons SET activation = activation * ?1",
        params![1.0 - ACTIVATION_DECAY_RATE],
    )?;
    tx.execute(
        "UPDATE neurons SET myelination = myelination * ?1",
        params![1.0 - MYELIN_DECAY_RATE],
    )?;
    tx.execute(
        "UPDATE synapses SET weight = weight * ?1",
        params![1.0 - SYNAPSE_DECAY_RATE],
    )?;

    let pruned_synapses = tx.execute(
        "DELETE FROM synapses WHERE weight < ?1",
        params![SYNAPSE_PRUNE_THRESHOLD],
    )?;

    let pruned_neurons = tx.execute(
        "DELETE FROM neurons WHERE activation < ?1 AND myelination < ?2 AND access_count < ?3",
        params![
            NEURON_PRUNE_ACTIVATION,
            NEURON_PRUNE_MYELINATION,
            NEURON_PRUNE_ACCESS_COUNT,
        ],
    )?;

    tx.commit()?;

    if pruned_synapses > 0 || pruned_neurons > 0 {
        tracing::info!(pruned_synapses, pruned_neurons, "decay pruned the graph");
    }

    Ok(DecayResult {
        pruned_synapses,
        pruned_neurons,
    })
}
