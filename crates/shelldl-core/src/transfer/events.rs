//! Transfer events - discriminated union for all transfer lifecycle changes.
//!
//! Emitted for passive and programmatic transfers alike, so the outcome of a
//! passive download is observable even though no caller awaits it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::types::{TerminalState, TransferId};

/// Single discriminated union for all transfer events.
///
/// Serialized with a `type` tag:
///
/// ```text
/// { "type": "transfer_started", "id": 1, "url": "...", "path": "...", "programmatic": true }
/// { "type": "transfer_progress", "id": 1, "received": 10, "total": 100, "fraction": 0.1 }
/// { "type": "transfer_finished", "id": 1, "state": "completed", "path": "..." }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferEvent {
    /// The host started a transfer and the coordinator took it over.
    TransferStarted {
        id: TransferId,
        /// Origin URL of the redirect chain.
        url: String,
        /// Resolved destination, absent when the user picks one interactively.
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        /// Whether a caller registered a request for this URL.
        programmatic: bool,
    },

    /// Bytes arrived for a transfer.
    TransferProgress {
        id: TransferId,
        received: u64,
        total: u64,
        /// Item-local fraction, absent when the total size is unknown.
        #[serde(skip_serializing_if = "Option::is_none")]
        fraction: Option<f64>,
    },

    /// The transfer reached a terminal state.
    TransferFinished {
        id: TransferId,
        state: TerminalState,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        /// Rendered error message for interrupted transfers.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// The coordinator could not take over a transfer and aborted it.
    TransferRejected { id: TransferId, error: String },
}

impl TransferEvent {
    /// The transfer this event refers to.
    #[must_use]
    pub const fn id(&self) -> TransferId {
        match self {
            Self::TransferStarted { id, .. }
            | Self::TransferProgress { id, .. }
            | Self::TransferFinished { id, .. }
            | Self::TransferRejected { id, .. } => *id,
        }
    }

    /// Create a progress event, computing the item fraction when the size is known.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn progress(id: TransferId, received: u64, total: u64) -> Self {
        let fraction = (total > 0).then(|| received as f64 / total as f64);
        Self::TransferProgress {
            id,
            received,
            total,
            fraction,
        }
    }

    /// Create a terminal event.
    #[must_use]
    pub const fn finished(
        id: TransferId,
        state: TerminalState,
        path: Option<PathBuf>,
        error: Option<String>,
    ) -> Self {
        Self::TransferFinished {
            id,
            state,
            path,
            error,
        }
    }
}
