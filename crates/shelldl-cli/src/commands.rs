//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show where a transfer would be saved
    Resolve {
        /// Filename suggested by the server
        #[arg(long = "name", default_value = "")]
        suggested_filename: String,

        /// MIME type reported by the server
        #[arg(long = "mime", default_value = "")]
        mime_type: String,

        /// Target directory (defaults to the configured downloads directory)
        #[arg(long = "dir")]
        directory: Option<PathBuf>,

        /// Explicit filename, bypasses inference and collision checks
        #[arg(long)]
        filename: Option<String>,

        /// Let the user pick the destination
        #[arg(long = "save-as")]
        save_as: bool,
    },

    /// Replay a host event scenario and print events as JSON lines
    Replay {
        /// Scenario file (JSON)
        scenario: PathBuf,
    },

    /// Show the effective settings
    Settings,
}
