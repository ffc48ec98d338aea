//! CLI `decay` command — run one decay/pruning cycle.

use anyhow::Result;

use crate::config::BrainBoxConfig;
use crate::engine::BrainBox;

/// Run one decay cycle and report what was pruned.
pub fn decay(config: &BrainBoxConfig) -> Result<()> {
    let mut engine = BrainBox::open(config.resolved_db_path())?;
    let result = engine.decay()?;

    println!("Decay complete.");
    println!("  Pruned synapses:  {}", result.pruned_synapses);
    println!("  Pruned neurons:   {}", result.pruned_neurons);

    engine.close()
}
