//! Host environment ports.
//!
//! The host owns transfers, sessions and windows. The coordinator only holds
//! shared references to them and reacts to the notifications they deliver.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::transfer::{SessionId, TerminalState, TransferId, WindowId};

/// Listener for a transfer's byte-count updates.
pub type UpdatedListener = Arc<dyn Fn() + Send + Sync>;

/// Listener for a transfer's single terminal notification.
pub type DoneListener = Box<dyn FnOnce(TerminalState) + Send>;

/// Listener for a session's "transfer started" notification.
///
/// The second argument is the window owning the request, already resolved
/// from embedded web views to their host window. `None` when no window owns it.
pub type WillDownloadListener = Arc<dyn Fn(Arc<dyn Transfer>, Option<WindowId>) + Send + Sync>;

/// Listener for a newly created session.
pub type SessionCreatedListener = Arc<dyn Fn(Arc<dyn HostSession>) + Send + Sync>;

/// Listener for a window or application closing.
pub type WindowClosedListener = Box<dyn FnOnce() + Send>;

/// Handle returned when subscribing to session notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// One in-flight or finished download, owned by the host.
pub trait Transfer: Send + Sync {
    /// Stable identifier for the lifetime of the transfer.
    fn id(&self) -> TransferId;

    /// Redirect chain. The first entry is the origin URL.
    fn url_chain(&self) -> Vec<String>;

    /// Filename suggested by the server or derived from the URL.
    fn suggested_filename(&self) -> String;

    /// Reported MIME type (may carry parameters).
    fn mime_type(&self) -> String;

    fn received_bytes(&self) -> u64;

    /// Total size, `0` when unknown.
    fn total_bytes(&self) -> u64;

    /// Write the transfer to `path` instead of prompting.
    fn set_save_path(&self, path: &Path);

    /// The path the host is writing to, once known.
    fn save_path(&self) -> Option<PathBuf>;

    /// Abort the transfer.
    fn cancel(&self);

    /// Subscribe to progress notifications.
    fn on_updated(&self, listener: UpdatedListener);

    /// Subscribe to the terminal notification. Fires at most once.
    fn once_done(&self, listener: DoneListener);
}

/// A browsing session that emits "transfer started" notifications.
pub trait HostSession: Send + Sync {
    fn id(&self) -> SessionId;

    /// Install a "transfer started" listener.
    fn on_will_download(&self, listener: WillDownloadListener) -> SubscriptionId;

    /// Remove a listener installed by `on_will_download`. Unknown ids are ignored.
    fn remove_listener(&self, subscription: SubscriptionId);
}

/// A top-level window able to trigger downloads.
pub trait HostWindow: Send + Sync {
    fn id(&self) -> WindowId;

    /// Session backing this window's content.
    fn session(&self) -> Arc<dyn HostSession>;

    /// Ask the host to start downloading `url`.
    fn download_url(&self, url: &str);

    /// Subscribe to the window closing.
    fn on_closed(&self, listener: WindowClosedListener);
}

/// The host application, for passive integration.
pub trait HostApp: Send + Sync {
    /// Subscribe to session creation.
    fn on_session_created(&self, listener: SessionCreatedListener);

    /// Subscribe to the application quitting.
    fn on_quit(&self, listener: WindowClosedListener);
}
