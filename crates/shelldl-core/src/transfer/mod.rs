//! Transfer domain types, options, events and errors.
//!
//! This module contains pure data types for the download coordinator.
//! No host, filesystem or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - Identifiers, lifecycle state machine, progress values
//! - `options` - Per-request options and error message templating
//! - `events` - Transfer lifecycle events
//! - `errors` - Error types for download operations

pub mod errors;
pub mod events;
pub mod options;
pub mod types;

pub use errors::{DownloadError, DownloadResult};
pub use events::TransferEvent;
pub use options::{CANCELLED_MESSAGE, DownloadOptions, ProgressCallback, render_error_message};
pub use types::{
    AggregateCounters, ProgressBar, SessionId, TerminalState, TransferId, TransferState, WindowId,
};
