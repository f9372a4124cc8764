//! Coordinator settings and validation.
//!
//! Settings sit between built-in defaults and per-request options: a request
//! option always wins, a setting fills in what the request leaves out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::{DOWNLOAD_DIR_ENV, PathError, default_downloads_dir};

/// Default template for the interrupted-state message.
pub const DEFAULT_ERROR_MESSAGE: &str = "The download of {filename} was interrupted";

/// Default title of the interrupted-state error box.
pub const DEFAULT_ERROR_TITLE: &str = "Download Error";

const ERROR_TITLE_ENV: &str = "SHELLDL_ERROR_TITLE";
const ERROR_MESSAGE_ENV: &str = "SHELLDL_ERROR_MESSAGE";
const REJECT_DUPLICATES_ENV: &str = "SHELLDL_REJECT_DUPLICATES";

/// Errors from loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Download directory cannot be empty")]
    EmptyDownloadDir,

    #[error("Error message template cannot be empty")]
    EmptyErrorMessage,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to read settings file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse settings file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Coordinator settings.
///
/// All fields are optional to support partial files and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory used when a request names none.
    pub download_dir: Option<PathBuf>,

    /// Title of the interrupted-state error box.
    pub error_title: Option<String>,

    /// Template for the interrupted-state message.
    pub error_message: Option<String>,

    /// Refuse a second request for a URL whose first caller is still waiting.
    /// `false` lets the newer request replace the older one.
    pub reject_duplicate_requests: Option<bool>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            download_dir: None,
            error_title: None,
            error_message: None,
            reject_duplicate_requests: Some(true),
        }
    }

    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Overlay values from the process environment.
    pub fn apply_env(self) -> Result<Self, SettingsError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable source.
    pub fn apply_vars(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        if let Some(dir) = lookup(DOWNLOAD_DIR_ENV) {
            self.download_dir = Some(PathBuf::from(dir));
        }
        if let Some(title) = lookup(ERROR_TITLE_ENV) {
            self.error_title = Some(title);
        }
        if let Some(message) = lookup(ERROR_MESSAGE_ENV) {
            self.error_message = Some(message);
        }
        if let Some(raw) = lookup(REJECT_DUPLICATES_ENV) {
            let value = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(SettingsError::InvalidValue {
                        key: REJECT_DUPLICATES_ENV.to_string(),
                        value: raw,
                    });
                }
            };
            self.reject_duplicate_requests = Some(value);
        }
        Ok(self)
    }

    /// The configured downloads directory, or the OS default.
    pub fn effective_download_dir(&self) -> Result<PathBuf, SettingsError> {
        match &self.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(default_downloads_dir()?),
        }
    }

    #[must_use]
    pub fn effective_error_title(&self) -> &str {
        self.error_title.as_deref().unwrap_or(DEFAULT_ERROR_TITLE)
    }

    #[must_use]
    pub fn effective_error_message(&self) -> &str {
        self.error_message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE)
    }

    #[must_use]
    pub fn effective_reject_duplicates(&self) -> bool {
        self.reject_duplicate_requests.unwrap_or(true)
    }
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(dir) = &settings.download_dir {
        if dir.as_os_str().is_empty() {
            return Err(SettingsError::EmptyDownloadDir);
        }
    }
    if let Some(message) = &settings.error_message {
        if message.trim().is_empty() {
            return Err(SettingsError::EmptyErrorMessage);
        }
    }
    Ok(())
}
