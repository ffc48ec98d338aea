mod cli;
mod config;
mod db;
mod engine;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brainbox", version, about = "Hebbian procedural memory engine for coding agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record an access to a file, tool, or error signature
    Record {
        /// Filesystem path, tool name, or error signature
        path: String,
        /// Neuron type: file, tool, error, or semantic
        #[arg(long = "type", default_value = "file")]
        neuron_type: String,
        /// Context string, e.g. the query that led to this access
        #[arg(long)]
        context: Option<String>,
    },
    /// Record a free-text fact as a semantic neuron
    Remember {
        /// The fact to remember
        text: String,
        #[arg(long)]
        context: Option<String>,
    },
    /// Query the graph for ranked recall candidates
    Recall {
        query: String,
        /// Neuron type: file, tool, error, or semantic
        #[arg(long = "type", default_value = "file")]
        neuron_type: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Run one decay/pruning cycle over the graph
    Decay,
    /// Show graph statistics and top superhighways
    Stats,
    /// Run database diagnostics
    Doctor,
    /// Delete the entire memory graph
    Reset,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Load config (for the database path and log level)
    let config = config::BrainBoxConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Record {
            path,
            neuron_type,
            context,
        } => cli::record::record(&config, &path, &neuron_type, context.as_deref()),
        Command::Remember { text, context } => {
            cli::record::remember(&config, &text, context.as_deref())
        }
        Command::Recall {
            query,
            neuron_type,
            limit,
        } => cli::recall::recall(&config, &query, &neuron_type, limit),
        Command::Decay => cli::decay::decay(&config),
        Command::Stats => cli::stats::stats(&config),
        Command::Doctor => cli::doctor::doctor(&config),
        Command::Reset => cli::reset::reset(&config),
    }
}
