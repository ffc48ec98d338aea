//! CLI `reset` command — delete the entire memory graph after confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use crate::config::BrainBoxConfig;

/// Delete all neurons, synapses, logs, and sessions after user confirmation.
pub fn reset(config: &BrainBoxConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WARNING: This will permanently delete ALL neurons, synapses, access logs, and sessions.");
    println!("Database: {}", db_path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let conn = crate::db::open_database(&db_path)?;

    // Drop all data — order matters for FK constraints
    conn.execute_batch(
        "DELETE FROM synapses;
         DELETE FROM access_log;
         DELETE FROM sessions;
         DELETE FROM neurons;",
    )?;

    println!("All memories deleted. Database reset complete.");
    Ok(())
}
