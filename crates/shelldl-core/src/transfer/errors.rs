//! Download error types.
//!
//! These errors are cloneable and serializable so they can be delivered to a
//! waiting caller and forwarded across adapter boundaries. I/O failures are
//! captured as strings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::options::CANCELLED_MESSAGE;

/// Error type for download operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// The transfer failed mid-flight. The message is already rendered from
    /// the request's error template.
    #[error("{message}")]
    Interrupted {
        /// User-facing message.
        message: String,
    },

    /// The transfer was stopped by the user or the host.
    #[error("The download has been cancelled")]
    Cancelled,

    /// Probing the destination directory failed.
    #[error("Could not resolve destination {}: {reason}", .path.display())]
    DestinationResolution {
        /// The candidate path being probed.
        path: PathBuf,
        /// Underlying I/O failure.
        reason: String,
    },

    /// Another caller is still waiting on a download of the same URL.
    #[error("A download of {key} is already pending")]
    AlreadyPending {
        /// Normalized URL key.
        key: String,
    },

    /// The URL could not be normalized into a correlation key.
    #[error("Invalid download URL {url}: {reason}")]
    InvalidUrl {
        /// The raw URL.
        url: String,
        /// Why normalization failed.
        reason: String,
    },

    /// The request was dropped before its transfer reached a terminal state.
    #[error("The download request was abandoned before the transfer finished")]
    Abandoned,
}

impl DownloadError {
    /// Create an interrupted error from a rendered message.
    pub fn interrupted(message: impl Into<String>) -> Self {
        Self::Interrupted {
            message: message.into(),
        }
    }

    /// Create a destination error from the probed path and I/O failure.
    pub fn destination(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::DestinationResolution {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Create an already-pending error.
    pub fn already_pending(key: impl Into<String>) -> Self {
        Self::AlreadyPending { key: key.into() }
    }

    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if the transfer itself failed (as opposed to the request).
    #[must_use]
    pub const fn is_transfer_failure(&self) -> bool {
        matches!(self, Self::Interrupted { .. } | Self::Cancelled)
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Interrupted { message } => message.clone(),
            Self::Cancelled => CANCELLED_MESSAGE.to_string(),
            Self::DestinationResolution { path, .. } => {
                format!("Could not choose where to save {}.", path.display())
            }
            Self::AlreadyPending { key } => {
                format!("A download of '{key}' is already in progress.")
            }
            Self::InvalidUrl { url, .. } => format!("'{url}' is not a valid download URL."),
            Self::Abandoned => "The download was abandoned.".to_string(),
        }
    }
}

/// Convenience result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;
