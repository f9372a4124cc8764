//! Settings loading for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the `--config` file,
//! `SHELLDL_*` environment variables.

use std::path::PathBuf;

use shelldl_core::{Settings, validate_settings};

use crate::error::CliError;

/// Inputs for building the CLI's settings.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Optional settings file.
    pub config_file: Option<PathBuf>,
}

impl CliConfig {
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }
}

/// Load, overlay and validate settings.
pub fn load_settings(config: &CliConfig) -> Result<Settings, CliError> {
    let base = match &config.config_file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading settings file");
            Settings::from_file(path)?
        }
        None => Settings::with_defaults(),
    };
    let settings = base.apply_env()?;
    validate_settings(&settings)?;
    Ok(settings)
}
