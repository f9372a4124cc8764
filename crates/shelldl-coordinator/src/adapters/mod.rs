//! Adapters for the core ports.
//!
//! - `fs` - `PathProbe` backed by the real filesystem
//! - `mime` - `MimeLookup` backed by `mime_guess`
//! - `events` - Event emitters that log, collect or fan out `TransferEvent`s
//! - `memory` - In-memory host (transfers, sessions, windows, app) and a
//!   recording shell, for headless hosts, replays and tests

pub mod events;
pub mod fs;
pub mod memory;
pub mod mime;

pub use events::{CollectingEmitter, FanoutEmitter, TracingEventEmitter};
pub use fs::FsPathProbe;
pub use mime::MimeGuessLookup;
