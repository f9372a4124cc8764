//! Root CLI parser and global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the download coordinator.
#[derive(Parser)]
#[command(name = "shelldl")]
#[command(about = "Resolve download destinations and replay host download events")]
#[command(version)]
pub struct Cli {
    /// Settings file (JSON) applied before environment overrides
    #[arg(long = "config", global = true, env = "SHELLDL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
