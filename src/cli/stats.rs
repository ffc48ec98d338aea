use anyhow::Result;

use crate::config::BrainBoxConfig;
use crate::engine::BrainBox;

/// Display graph statistics in the terminal.
pub fn stats(config: &BrainBoxConfig) -> Result<()> {
    let mut engine = BrainBox::open(config.resolved_db_path())?;
    let stats = engine.stats()?;

    println!("Memory Graph Statistics");
    println!("{}", "=".repeat(40));
    println!("  Neurons:             {}", stats.neuron_count);
    println!("  Synapses:            {}", stats.synapse_count);
    println!("  Superhighways:       {}", stats.superhighways);
    println!("  Total accesses:      {}", stats.total_accesses);
    println!("  Avg myelination:     {:.3}", stats.avg_myelination);

    let highways = engine.superhighways(10)?;
    if !highways.is_empty() {
        println!();
        println!("Top superhighways:");
        for neuron in &highways {
            println!(
                "  [{:.2}] ({}) {}",
                neuron.myelination, neuron.neuron_type, neuron.path
            );
        }
    }

    let synapses = engine.strongest_synapses(10)?;
    if !synapses.is_empty() {
        println!();
        println!("Strongest connections:");
        for synapse in &synapses {
            println!(
                "  [{:.2}] {} -> {} ({} co-accesses)",
                synapse.weight, synapse.source_id, synapse.target_id, synapse.co_access_count
            );
        }
    }

    engine.close()
}
