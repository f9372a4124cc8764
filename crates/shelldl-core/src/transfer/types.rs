//! Core identifiers and value types for transfers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-assigned identifier of a single transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(pub u64);

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transfer-{}", self.0)
    }
}

/// Host-assigned identifier of a browsing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Host-assigned identifier of a top-level window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// The three ways a transfer can end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// All bytes were written to the destination.
    Completed,
    /// Stopped by the user or the host.
    Cancelled,
    /// Failed mid-flight (network or filesystem).
    Interrupted,
}

impl TerminalState {
    /// String form used in logs and events.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Interrupted => "interrupted",
        }
    }

    /// Parse the host's string form. Unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "interrupted" => Some(Self::Interrupted),
            _ => None,
        }
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a tracked transfer.
///
/// `Starting -> Active` on the first progress notification. The terminal
/// notification ends tracking, so terminal outcomes are reported through
/// [`TerminalState`] instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    #[default]
    Starting,
    Active,
}

impl TransferState {
    /// Record a progress notification. Returns `true` if the state changed.
    pub fn observe_progress(&mut self) -> bool {
        if *self == Self::Starting {
            *self = Self::Active;
            true
        } else {
            false
        }
    }
}

/// Value pushed to a window's OS progress indicator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProgressBar {
    /// Fraction in `[0, 1]`.
    Value(f64),
    /// Remove the indicator.
    Clear,
}

/// Process-wide byte counters for the current batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounters {
    /// `completed_bytes` plus the received bytes of every active transfer.
    pub received_bytes: u64,
    /// Sum of the total sizes of transfers that finished in this batch.
    pub completed_bytes: u64,
    /// Sum of the total sizes of every transfer started in this batch.
    pub total_bytes: u64,
}

impl AggregateCounters {
    /// Whether all counters are back at zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.received_bytes == 0 && self.completed_bytes == 0 && self.total_bytes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_activates_once() {
        let mut state = TransferState::default();
        assert!(state.observe_progress());
        assert_eq!(state, TransferState::Active);
        assert!(!state.observe_progress());
    }

    #[test]
    fn test_terminal_state_parse() {
        assert_eq!(
            TerminalState::parse("interrupted"),
            Some(TerminalState::Interrupted)
        );
        assert_eq!(TerminalState::parse("progressing"), None);
        assert_eq!(TerminalState::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_progress_bar_serialization() {
        let json = serde_json::to_string(&ProgressBar::Value(0.5)).unwrap();
        assert_eq!(json, r#"{"kind":"value","value":0.5}"#);
        let json = serde_json::to_string(&ProgressBar::Clear).unwrap();
        assert_eq!(json, r#"{"kind":"clear"}"#);
    }
}
