//! In-memory host.
//!
//! Plays the host's role without a real shell: transfers whose bytes and
//! outcome are driven by the caller, sessions and windows that record what
//! the coordinator asked of them, and a shell that records side effects.
//!
//! Listeners are cloned out of the internal lock before being invoked, so a
//! listener may call back into the same object.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shelldl_core::ports::{
    DoneListener, HostApp, HostSession, HostWindow, MimeLookup, SessionCreatedListener,
    ShellPort, SubscriptionId, Transfer, UpdatedListener, WillDownloadListener,
    WindowClosedListener,
};
use shelldl_core::{ProgressBar, SessionId, TerminalState, TransferId, WindowId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Transfer
// =============================================================================

/// Builder for [`MemoryTransfer`].
#[derive(Debug, Clone)]
pub struct MemoryTransferBuilder {
    id: TransferId,
    url_chain: Vec<String>,
    suggested_filename: String,
    mime_type: String,
    total_bytes: u64,
}

impl MemoryTransferBuilder {
    /// Append a redirect target to the URL chain.
    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.url_chain.push(url.into());
        self
    }

    pub fn suggested_filename(mut self, name: impl Into<String>) -> Self {
        self.suggested_filename = name.into();
        self
    }

    pub fn mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = mime.into();
        self
    }

    pub const fn total_bytes(mut self, total: u64) -> Self {
        self.total_bytes = total;
        self
    }

    pub fn build(self) -> Arc<MemoryTransfer> {
        Arc::new(MemoryTransfer {
            id: self.id,
            url_chain: self.url_chain,
            suggested_filename: self.suggested_filename,
            mime_type: self.mime_type,
            state: Mutex::new(TransferInner {
                total_bytes: self.total_bytes,
                ..TransferInner::default()
            }),
        })
    }
}

#[derive(Default)]
struct TransferInner {
    received_bytes: u64,
    total_bytes: u64,
    save_path: Option<PathBuf>,
    cancelled: bool,
    outcome: Option<TerminalState>,
    updated: Vec<UpdatedListener>,
    done: Vec<DoneListener>,
}

/// A transfer driven by the caller.
pub struct MemoryTransfer {
    id: TransferId,
    url_chain: Vec<String>,
    suggested_filename: String,
    mime_type: String,
    state: Mutex<TransferInner>,
}

impl MemoryTransfer {
    /// Start building a transfer whose origin URL is `url`.
    pub fn builder(id: TransferId, url: impl Into<String>) -> MemoryTransferBuilder {
        MemoryTransferBuilder {
            id,
            url_chain: vec![url.into()],
            suggested_filename: String::new(),
            mime_type: String::new(),
            total_bytes: 0,
        }
    }

    pub fn set_received(&self, received: u64) {
        lock(&self.state).received_bytes = received;
    }

    /// Change the reported total (servers may announce it late).
    pub fn set_total(&self, total: u64) {
        lock(&self.state).total_bytes = total;
    }

    /// Deliver a progress notification to every subscriber.
    pub fn emit_updated(&self) {
        let listeners = {
            let state = lock(&self.state);
            if state.outcome.is_some() {
                return;
            }
            state.updated.clone()
        };
        for listener in listeners {
            listener();
        }
    }

    /// End the transfer. Only the first call has an effect.
    pub fn finish(&self, outcome: TerminalState) -> bool {
        let listeners = {
            let mut state = lock(&self.state);
            if state.outcome.is_some() {
                return false;
            }
            state.outcome = Some(outcome);
            std::mem::take(&mut state.done)
        };
        for listener in listeners {
            listener(outcome);
        }
        true
    }

    pub fn is_cancelled(&self) -> bool {
        lock(&self.state).cancelled
    }

    pub fn outcome(&self) -> Option<TerminalState> {
        lock(&self.state).outcome
    }
}

impl Transfer for MemoryTransfer {
    fn id(&self) -> TransferId {
        self.id
    }

    fn url_chain(&self) -> Vec<String> {
        self.url_chain.clone()
    }

    fn suggested_filename(&self) -> String {
        self.suggested_filename.clone()
    }

    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn received_bytes(&self) -> u64 {
        lock(&self.state).received_bytes
    }

    fn total_bytes(&self) -> u64 {
        lock(&self.state).total_bytes
    }

    fn set_save_path(&self, path: &Path) {
        lock(&self.state).save_path = Some(path.to_path_buf());
    }

    fn save_path(&self) -> Option<PathBuf> {
        lock(&self.state).save_path.clone()
    }

    fn cancel(&self) {
        lock(&self.state).cancelled = true;
        self.finish(TerminalState::Cancelled);
    }

    fn on_updated(&self, listener: UpdatedListener) {
        lock(&self.state).updated.push(listener);
    }

    fn once_done(&self, listener: DoneListener) {
        lock(&self.state).done.push(listener);
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Default)]
struct SessionInner {
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, WillDownloadListener)>,
}

/// A session that starts transfers on demand.
pub struct MemorySession {
    id: SessionId,
    state: Mutex<SessionInner>,
}

impl MemorySession {
    pub fn new(id: SessionId) -> Arc<Self> {
        Arc::new(Self {
            id,
            state: Mutex::new(SessionInner::default()),
        })
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.state).listeners.len()
    }

    /// Deliver a "transfer started" notification to every listener.
    pub fn start_transfer(&self, transfer: Arc<dyn Transfer>, window: Option<WindowId>) {
        let listeners: Vec<WillDownloadListener> = lock(&self.state)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(Arc::clone(&transfer), window);
        }
    }
}

impl HostSession for MemorySession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn on_will_download(&self, listener: WillDownloadListener) -> SubscriptionId {
        let mut state = lock(&self.state);
        state.next_subscription += 1;
        let subscription = SubscriptionId(state.next_subscription);
        state.listeners.push((subscription, listener));
        subscription
    }

    fn remove_listener(&self, subscription: SubscriptionId) {
        lock(&self.state)
            .listeners
            .retain(|(id, _)| *id != subscription);
    }
}

// =============================================================================
// Window
// =============================================================================

#[derive(Default)]
struct WindowInner {
    requested: Vec<String>,
    closed: Vec<WindowClosedListener>,
}

/// A window that records the URLs it was asked to download.
pub struct MemoryWindow {
    id: WindowId,
    session: Arc<MemorySession>,
    state: Mutex<WindowInner>,
}

impl MemoryWindow {
    pub fn new(id: WindowId, session: Arc<MemorySession>) -> Arc<Self> {
        Arc::new(Self {
            id,
            session,
            state: Mutex::new(WindowInner::default()),
        })
    }

    /// URLs passed to `download_url`, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        lock(&self.state).requested.clone()
    }

    /// Number of pending close listeners.
    pub fn close_listener_count(&self) -> usize {
        lock(&self.state).closed.len()
    }

    /// Fire the close notification.
    pub fn close(&self) {
        let listeners = std::mem::take(&mut lock(&self.state).closed);
        for listener in listeners {
            listener();
        }
    }
}

impl HostWindow for MemoryWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn session(&self) -> Arc<dyn HostSession> {
        Arc::clone(&self.session) as Arc<dyn HostSession>
    }

    fn download_url(&self, url: &str) {
        lock(&self.state).requested.push(url.to_string());
    }

    fn on_closed(&self, listener: WindowClosedListener) {
        lock(&self.state).closed.push(listener);
    }
}

// =============================================================================
// Application
// =============================================================================

#[derive(Default)]
struct AppInner {
    session_created: Vec<SessionCreatedListener>,
    quit: Vec<WindowClosedListener>,
}

/// An application that announces sessions and quits on demand.
#[derive(Default)]
pub struct MemoryApp {
    state: Mutex<AppInner>,
}

impl MemoryApp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Announce a new session.
    pub fn create_session(&self, session: Arc<dyn HostSession>) {
        let listeners = lock(&self.state).session_created.clone();
        for listener in listeners {
            listener(Arc::clone(&session));
        }
    }

    /// Fire the quit notification.
    pub fn quit(&self) {
        let listeners = std::mem::take(&mut lock(&self.state).quit);
        for listener in listeners {
            listener();
        }
    }
}

impl HostApp for MemoryApp {
    fn on_session_created(&self, listener: SessionCreatedListener) {
        lock(&self.state).session_created.push(listener);
    }

    fn on_quit(&self, listener: WindowClosedListener) {
        lock(&self.state).quit.push(listener);
    }
}

// =============================================================================
// Shell
// =============================================================================

/// A side effect requested from the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCall {
    SetProgressBar {
        window: WindowId,
        progress: ProgressBar,
    },
    DockDownloadFinished(PathBuf),
    ShowItemInFolder(PathBuf),
    ShowErrorBox {
        title: String,
        message: String,
    },
}

/// A shell that records every call.
#[derive(Default)]
pub struct RecordingShell {
    dock: bool,
    calls: Mutex<Vec<ShellCall>>,
    destroyed: Mutex<HashSet<WindowId>>,
}

impl RecordingShell {
    /// A shell on a platform with a dock.
    pub fn with_dock() -> Self {
        Self {
            dock: true,
            ..Self::default()
        }
    }

    /// Mark a window as destroyed.
    pub fn destroy_window(&self, window: WindowId) {
        lock(&self.destroyed).insert(window);
    }

    pub fn calls(&self) -> Vec<ShellCall> {
        lock(&self.calls).clone()
    }

    /// Indicator values pushed to `window`, in order.
    pub fn progress_updates(&self, window: WindowId) -> Vec<ProgressBar> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                ShellCall::SetProgressBar { window: w, progress } if *w == window => {
                    Some(*progress)
                }
                _ => None,
            })
            .collect()
    }

    /// `(title, message)` of every error box shown.
    pub fn error_boxes(&self) -> Vec<(String, String)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                ShellCall::ShowErrorBox { title, message } => {
                    Some((title.clone(), message.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ShellCall) {
        lock(&self.calls).push(call);
    }
}

impl ShellPort for RecordingShell {
    fn is_window_alive(&self, window: WindowId) -> bool {
        !lock(&self.destroyed).contains(&window)
    }

    fn set_progress_bar(&self, window: WindowId, progress: ProgressBar) {
        self.record(ShellCall::SetProgressBar { window, progress });
    }

    fn supports_dock(&self) -> bool {
        self.dock
    }

    fn dock_download_finished(&self, path: &Path) {
        self.record(ShellCall::DockDownloadFinished(path.to_path_buf()));
    }

    fn show_item_in_folder(&self, path: &Path) {
        self.record(ShellCall::ShowItemInFolder(path.to_path_buf()));
    }

    fn show_error_box(&self, title: &str, message: &str) {
        self.record(ShellCall::ShowErrorBox {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

// =============================================================================
// MIME table
// =============================================================================

/// A fixed MIME-to-extension table.
#[derive(Debug, Clone, Default)]
pub struct StaticMimeTable {
    entries: HashMap<String, Vec<String>>,
}

impl StaticMimeTable {
    pub fn with(mut self, mime: &str, extensions: &[&str]) -> Self {
        self.entries.insert(
            mime.to_string(),
            extensions.iter().map(|ext| (*ext).to_string()).collect(),
        );
        self
    }
}

impl MimeLookup for StaticMimeTable {
    fn extensions(&self, mime: &str) -> Vec<String> {
        self.entries.get(mime).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_transfer_finishes_once() {
        let transfer = MemoryTransfer::builder(TransferId(1), "https://example.com/a").build();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        transfer.once_done(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(transfer.finish(TerminalState::Completed));
        assert!(!transfer.finish(TerminalState::Interrupted));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(transfer.outcome(), Some(TerminalState::Completed));
    }

    #[test]
    fn test_cancel_finishes_as_cancelled() {
        let transfer = MemoryTransfer::builder(TransferId(1), "https://example.com/a").build();
        transfer.cancel();
        assert!(transfer.is_cancelled());
        assert_eq!(transfer.outcome(), Some(TerminalState::Cancelled));
    }

    #[test]
    fn test_listener_may_reenter_session() {
        let session = MemorySession::new(SessionId(1));
        let inner = Arc::clone(&session);
        session.on_will_download(Arc::new(move |_, _| {
            // Would deadlock if the session held its lock while notifying.
            assert_eq!(inner.listener_count(), 1);
        }));

        let transfer = MemoryTransfer::builder(TransferId(1), "https://example.com/a").build();
        session.start_transfer(transfer, None);
    }

    #[test]
    fn test_redirect_chain_keeps_origin_first() {
        let transfer = MemoryTransfer::builder(TransferId(1), "https://example.com/a")
            .redirect("https://cdn.example.com/a")
            .build();
        assert_eq!(
            transfer.url_chain(),
            vec!["https://example.com/a", "https://cdn.example.com/a"]
        );
    }

    #[test]
    fn test_recording_shell_tracks_destroyed_windows() {
        let shell = RecordingShell::default();
        assert!(shell.is_window_alive(WindowId(1)));
        shell.destroy_window(WindowId(1));
        assert!(!shell.is_window_alive(WindowId(1)));
        assert!(!shell.supports_dock());
        assert!(RecordingShell::with_dock().supports_dock());
    }
}
