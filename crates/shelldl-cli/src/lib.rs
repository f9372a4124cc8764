//! Command-line front end for the shelldl download coordinator.
//!
//! - `resolve` - show where a transfer would be saved
//! - `replay` - drive the coordinator with a scripted host scenario and print
//!   the resulting events as JSON lines
//! - `settings` - show the effective settings

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use anyhow as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, load_settings};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
