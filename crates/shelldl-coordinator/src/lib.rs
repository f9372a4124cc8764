//! Download-event coordinator for desktop shells.
//!
//! Intercepts the host's "transfer started" notifications, picks a
//! destination for each transfer, keeps aggregate progress across all active
//! transfers and settles the caller's future when a transfer ends.
//!
//! # Modules
//!
//! - `destination` - Destination path resolution and collision avoidance
//! - `correlation` - Pending programmatic requests keyed by origin URL
//! - `sessions` - At most one listener per host session
//! - `progress` - Aggregate byte counters for the current batch
//! - `dispatch` - Terminal-state side effects and request settlement
//! - `coordinator` - Wiring, programmatic and passive entry points
//! - `adapters` - Filesystem, MIME, logging and in-memory host adapters

// Re-export core types for convenience
pub use shelldl_core::{
    AggregateCounters, DownloadError, DownloadOptions, DownloadResult, ProgressBar, Settings,
    TerminalState, TransferEvent, TransferId, TransferState,
};

pub mod adapters;
mod coordinator;
mod correlation;
mod destination;
mod dispatch;
mod progress;
mod sessions;

pub use coordinator::{Coordinator, CoordinatorDeps, TransferHandle, build_coordinator};
pub use correlation::{PendingDownload, normalize_key};
pub use destination::{Destination, DestinationResolver, unused_path};
pub use progress::{ProgressAggregator, ProgressSnapshot};
