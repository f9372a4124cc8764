//! Core domain types and port definitions for shelldl.
//!
//! This crate holds the pure data types of the download coordinator (transfer
//! states, request options, errors, lifecycle events) and the port traits
//! through which the coordinator talks to the host shell, the OS shell
//! integration, the filesystem and MIME tables.
//!
//! # Structure
//!
//! - `transfer` - Identifiers, state machine, options, errors and events
//! - `ports` - Trait abstractions for external collaborators
//! - `paths` - Default downloads directory resolution
//! - `settings` - Coordinator configuration

pub mod paths;
pub mod ports;
pub mod settings;
pub mod transfer;

// Re-export commonly used types for convenience
pub use paths::{PathError, default_downloads_dir};
pub use ports::{
    DoneListener, HostApp, HostSession, HostWindow, MimeLookup, NoopShell, NoopTransferEmitter,
    PathProbe, SessionCreatedListener, ShellPort, SubscriptionId, Transfer, TransferEventEmitterPort,
    UpdatedListener, WillDownloadListener, WindowClosedListener,
};
pub use settings::{
    DEFAULT_ERROR_MESSAGE, DEFAULT_ERROR_TITLE, Settings, SettingsError, validate_settings,
};
pub use transfer::{
    AggregateCounters, CANCELLED_MESSAGE, DownloadError, DownloadOptions, DownloadResult,
    ProgressBar, ProgressCallback, SessionId, TerminalState, TransferEvent, TransferId,
    TransferState, WindowId, render_error_message,
};
