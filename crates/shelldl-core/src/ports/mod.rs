//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the coordinator expects from the host shell,
//! the OS integration layer, the filesystem and the MIME tables. They contain
//! no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - Host notifications are delivered by calling listeners the coordinator
//!   installs; the coordinator never polls
//! - OS-facing calls are fire-and-forget and must not block
//! - Listeners are `Send + Sync` so hosts may dispatch from any thread

pub mod event_emitter;
pub mod filesystem;
pub mod host;
pub mod mime;
pub mod shell;

pub use event_emitter::{NoopTransferEmitter, TransferEventEmitterPort};
pub use filesystem::PathProbe;
pub use host::{
    DoneListener, HostApp, HostSession, HostWindow, SessionCreatedListener, SubscriptionId,
    Transfer, UpdatedListener, WillDownloadListener, WindowClosedListener,
};
pub use mime::MimeLookup;
pub use shell::{NoopShell, ShellPort};
