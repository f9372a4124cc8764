//! CLI error types and exit codes.

use shelldl_core::{DownloadError, SettingsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Settings could not be loaded or are invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] SettingsError),

    /// The coordinator refused a request.
    #[error("{0}")]
    Download(#[from] DownloadError),

    /// The scenario file is unreadable or inconsistent.
    #[error("Invalid scenario: {0}")]
    Scenario(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to an exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Download(_) => 1,
            Self::Scenario(_) => 65, // EX_DATAERR
            Self::Io(_) => 74,       // EX_IOERR
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
