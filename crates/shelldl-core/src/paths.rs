//! Default downloads directory resolution.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable overriding the downloads directory.
pub const DOWNLOAD_DIR_ENV: &str = "SHELLDL_DOWNLOAD_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Neither the OS nor the environment names a downloads directory.
    #[error("Cannot determine the downloads directory")]
    NoDownloadsDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,
}

/// Get the directory downloads land in when a request names none.
///
/// Resolution order:
/// 1. `SHELLDL_DOWNLOAD_DIR` environment variable (highest priority)
/// 2. The OS downloads folder (e.g., `~/Downloads`, XDG user dirs)
/// 3. `Downloads` under the home directory
pub fn default_downloads_dir() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DOWNLOAD_DIR_ENV) {
        if path.trim().is_empty() {
            return Err(PathError::EmptyPath);
        }
        tracing::debug!(path = %path, "Using downloads directory from environment");
        return Ok(PathBuf::from(path));
    }

    if let Some(dir) = dirs::download_dir() {
        return Ok(dir);
    }

    tracing::debug!("No OS downloads directory, falling back to home");
    dirs::home_dir()
        .map(|home| home.join("Downloads"))
        .ok_or(PathError::NoDownloadsDir)
}
