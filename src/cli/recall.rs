//! CLI `recall` command — query the graph and print ranked candidates.

use anyhow::Result;

use crate::config::BrainBoxConfig;
use crate::engine::{BrainBox, NeuronType};

/// Query the graph and print ranked recall candidates.
///
/// A failed recall degrades to an empty result set rather than an error.
pub fn recall(config: &BrainBoxConfig, query: &str, type_str: &str, limit: usize) -> Result<()> {
    let Ok(neuron_type) = type_str.parse::<NeuronType>() else {
        tracing::warn!(neuron_type = type_str, "unknown neuron type");
        println!("No recall candidates.");
        return Ok(());
    };

    let mut engine = BrainBox::open(config.resolved_db_path())?;
    let results = match engine.recall(query, neuron_type, limit) {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!(error = %e, "recall failed, returning nothing");
            Vec::new()
        }
    };

    if results.is_empty() {
        println!("No recall candidates.");
    } else {
        for (rank, result) in results.iter().enumerate() {
            println!(
                "{}. [{:.2}] ({}) {}",
                rank + 1,
                result.confidence,
                result.activation_path,
                result.neuron.path,
            );
        }
    }

    engine.close()
}
