use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "fr-miner")]
#[command(about = "Publish new Federal Register documents as static news stories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// RON config file (defaults to ./miner.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Mine today's documents and publish them as one batch
    Today {
        /// Stop after this many new stories
        #[arg(long, default_value_t = 100)]
        batch_limit: usize,
    },

    /// Mine the last DAYS days, publishing every CHECKPOINT stories
    History {
        /// Number of days to walk back from today
        #[arg(default_value_t = 7)]
        days: u32,
        /// Accumulated story count that triggers a save and publish
        #[arg(long, default_value_t = 100)]
        checkpoint: usize,
    },
}
