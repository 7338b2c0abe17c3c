//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "lodestone", about = "Chunk meshing demo")]
pub struct CliArgs {
    /// Meshing worker threads (0 = based on CPU count).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Maximum meshing jobs in flight.
    #[arg(long)]
    pub budget: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Radius of the generated world in chunks.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Sections per generated chunk column.
    #[arg(long)]
    pub sections: Option<u32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(workers) = args.workers {
            self.meshing.worker_count = workers;
        }
        if let Some(budget) = args.budget {
            self.meshing.task_budget = budget;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
