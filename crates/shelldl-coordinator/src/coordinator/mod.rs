//! Coordinator wiring.
//!
//! Ties the correlation table, destination resolver, progress aggregator and
//! terminal dispatcher to the host's notifications.
//!
//! # Concurrency Model
//!
//! - All shared state (pending requests, sessions, active transfers,
//!   counters) lives behind one mutex, so handlers observe and mutate it in
//!   whole steps even if the host dispatches from several threads
//! - Two host calls run under the lock: installing a session listener, so a
//!   session never gets two, and window indicator updates, so they reach the
//!   shell in counter order. Neither may call back into the coordinator
//! - Listener removal, transfer control, the remaining shell side effects,
//!   progress callbacks and request settlement run after the lock is released
//! - Host listeners hold a `Weak` reference; dropping the last `Coordinator`
//!   turns late notifications into no-ops

mod handle;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use shelldl_core::ports::{
    HostApp, HostSession, HostWindow, MimeLookup, PathProbe, ShellPort, Transfer,
    TransferEventEmitterPort, WillDownloadListener,
};
use shelldl_core::{
    AggregateCounters, DownloadError, DownloadOptions, ProgressBar, SessionId, Settings,
    SettingsError, TerminalState, TransferEvent, TransferId, TransferState, WindowId,
    validate_settings,
};
use tokio::sync::oneshot;

use crate::correlation::{PendingDownload, PendingRequest, RequestTable, normalize_key};
use crate::destination::DestinationResolver;
use crate::dispatch::{FinishedTransfer, TerminalDispatcher};
use crate::progress::ProgressAggregator;
use crate::sessions::{Detached, SessionRegistry};

pub use handle::TransferHandle;

/// Dependencies for building a coordinator.
///
/// These are Arc references to ports, wired at the composition root.
#[derive(Clone)]
pub struct CoordinatorDeps {
    /// OS shell integration (progress bar, dock, reveal, error box).
    pub shell: Arc<dyn ShellPort>,
    /// Transfer lifecycle event sink.
    pub emitter: Arc<dyn TransferEventEmitterPort>,
    /// MIME-to-extension table.
    pub mime: Arc<dyn MimeLookup>,
    /// Filesystem probe for collision avoidance.
    pub probe: Arc<dyn PathProbe>,
    /// Coordinator settings.
    pub settings: Settings,
}

/// Build a coordinator from its dependencies.
pub fn build_coordinator(deps: CoordinatorDeps) -> Result<Coordinator, SettingsError> {
    validate_settings(&deps.settings)?;
    let download_dir = deps.settings.effective_download_dir()?;
    tracing::debug!(dir = %download_dir.display(), "Building download coordinator");

    let inner = Inner {
        state: Mutex::new(SharedState {
            requests: RequestTable::new(deps.settings.effective_reject_duplicates()),
            sessions: SessionRegistry::default(),
            progress: ProgressAggregator::new(),
            tracked: HashMap::new(),
            progress_windows: HashSet::new(),
        }),
        resolver: DestinationResolver::new(download_dir, deps.mime, deps.probe),
        dispatcher: TerminalDispatcher::new(
            Arc::clone(&deps.shell),
            Arc::clone(&deps.emitter),
            deps.settings.effective_error_title(),
            deps.settings.effective_error_message(),
        ),
        error_title: deps.settings.effective_error_title().to_string(),
        shell: deps.shell,
        emitter: deps.emitter,
    };

    Ok(Coordinator {
        inner: Arc::new(inner),
    })
}

/// A transfer between its start and terminal notifications.
struct TrackedTransfer {
    transfer: Arc<dyn Transfer>,
    request: PendingRequest,
    window: Option<WindowId>,
    destination: Option<PathBuf>,
    state: TransferState,
}

struct SharedState {
    requests: RequestTable,
    sessions: SessionRegistry,
    progress: ProgressAggregator,
    tracked: HashMap<TransferId, TrackedTransfer>,
    /// Windows whose indicator was set during the current batch.
    progress_windows: HashSet<WindowId>,
}

struct Inner {
    state: Mutex<SharedState>,
    resolver: DestinationResolver,
    dispatcher: TerminalDispatcher,
    error_title: String,
    shell: Arc<dyn ShellPort>,
    emitter: Arc<dyn TransferEventEmitterPort>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        // Every mutation completes under the lock, so a poisoned guard still
        // holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide download coordinator.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

impl Coordinator {
    // =========================================================================
    // Session registry
    // =========================================================================

    /// Listen for transfers started in `session` until detached, whatever
    /// happens to its windows. Repeated calls are no-ops.
    pub fn attach(&self, session: Arc<dyn HostSession>) -> bool {
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .lock()
            .sessions
            .attach(session, || will_download_listener(weak))
    }

    /// Stop listening to `session`. Unknown sessions are ignored.
    pub fn detach(&self, session: SessionId) -> bool {
        let Some(detached) = self.inner.lock().sessions.detach(session) else {
            return false;
        };
        detached.cancel();
        true
    }

    /// Stop listening to every session.
    pub fn detach_all(&self) -> usize {
        let detached = self.inner.lock().sessions.detach_all();
        let removed = detached.len();
        detached.into_iter().for_each(Detached::cancel);
        removed
    }

    /// Drop `window`'s claim on its session's listener.
    fn release_window(&self, session: SessionId, window: WindowId) {
        let detached = self.inner.lock().sessions.release_window(session, window);
        if let Some(detached) = detached {
            detached.cancel();
        }
    }

    pub fn is_attached(&self, session: SessionId) -> bool {
        self.inner.lock().sessions.is_attached(session)
    }

    pub fn attached_sessions(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    /// Handle every download of the application with default options:
    /// attach to each session the host creates, detach all when it quits.
    pub fn enable_passive(&self, app: &dyn HostApp) {
        let weak = Arc::downgrade(&self.inner);
        app.on_session_created(Arc::new(move |session| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.attach(session);
            }
        }));

        let weak = Arc::downgrade(&self.inner);
        app.on_quit(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                let removed = Self { inner }.detach_all();
                tracing::debug!(sessions = removed, "Application quit, listeners removed");
            }
        }));
    }

    /// Options applied to transfers nobody registered a request for.
    pub fn set_passive_defaults(&self, options: DownloadOptions) {
        self.inner.lock().requests.set_passive_defaults(options);
    }

    // =========================================================================
    // Programmatic API
    // =========================================================================

    /// Download `url` in `window` and wait for the outcome.
    ///
    /// The request is registered before the host is asked to start the
    /// transfer, so the "transfer started" notification always finds it.
    /// The returned future resolves once, when the transfer ends.
    pub fn start_download(
        &self,
        window: &dyn HostWindow,
        url: &str,
        options: DownloadOptions,
    ) -> PendingDownload {
        let key = match normalize_key(url) {
            Ok(key) => key,
            Err(err) => return PendingDownload::failed(err),
        };

        let session = window.session();
        let session_id = session.id();
        let window_id = window.id();
        let (tx, rx) = oneshot::channel();
        let first_request = {
            let mut state = self.inner.lock();
            if let Err(err) = state
                .requests
                .register(key.clone(), PendingRequest::programmatic(options, tx))
            {
                return PendingDownload::failed(err);
            }
            let weak = Arc::downgrade(&self.inner);
            state
                .sessions
                .attach_window(session, window_id, || will_download_listener(weak))
        };

        if first_request {
            let weak = Arc::downgrade(&self.inner);
            window.on_closed(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Self { inner }.release_window(session_id, window_id);
                }
            }));
        }

        tracing::debug!(key = %key, window = %window_id, "Requesting download");
        window.download_url(url);
        PendingDownload::waiting(rx)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub fn counters(&self) -> AggregateCounters {
        self.inner.lock().progress.counters()
    }

    pub fn active_transfers(&self) -> usize {
        self.inner.lock().progress.active_count()
    }

    pub fn pending_requests(&self) -> usize {
        self.inner.lock().requests.len()
    }

    /// Lifecycle state of a tracked transfer, `None` once it finished.
    pub fn transfer_state(&self, id: TransferId) -> Option<TransferState> {
        self.inner.lock().tracked.get(&id).map(|t| t.state)
    }

    // =========================================================================
    // Host notifications
    // =========================================================================

    /// Take over a transfer the host just started.
    fn handle_will_download(&self, transfer: Arc<dyn Transfer>, window: Option<WindowId>) {
        let id = transfer.id();
        let Some(origin) = transfer.url_chain().into_iter().next() else {
            tracing::warn!(transfer = %id, "Transfer without URL chain, ignoring");
            return;
        };
        let key = normalize_key(&origin).unwrap_or_else(|err| {
            tracing::warn!(transfer = %id, error = %err, "Using raw URL as correlation key");
            origin.clone()
        });

        let request = self.inner.lock().requests.take_and_clear(&key);
        let programmatic = request.is_programmatic();

        let destination = match self.inner.resolver.resolve(
            &transfer.suggested_filename(),
            &transfer.mime_type(),
            &request.options,
        ) {
            Ok(destination) => destination,
            Err(err) => {
                self.abort(&transfer, request, err);
                return;
            }
        };

        let path = destination.path().map(PathBuf::from);
        if !request.options.save_as {
            if let Some(path) = &path {
                transfer.set_save_path(path);
            }
        }

        tracing::info!(
            transfer = %id,
            key = %key,
            path = ?path,
            programmatic,
            "Download started"
        );

        {
            let mut state = self.inner.lock();
            if state.tracked.contains_key(&id) {
                tracing::warn!(transfer = %id, "Duplicate start notification, ignoring");
                return;
            }
            state.progress.on_transfer_start(Arc::clone(&transfer));
            state.tracked.insert(
                id,
                TrackedTransfer {
                    transfer: Arc::clone(&transfer),
                    request,
                    window,
                    destination: path.clone(),
                    state: TransferState::Starting,
                },
            );
        }

        self.inner.emitter.emit(TransferEvent::TransferStarted {
            id,
            url: origin,
            path,
            programmatic,
        });

        let weak = Arc::downgrade(&self.inner);
        transfer.on_updated(Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.handle_progress(id);
            }
        }));

        let weak = Arc::downgrade(&self.inner);
        transfer.once_done(Box::new(move |outcome| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.handle_done(id, outcome);
            }
        }));
    }

    /// Give up on a transfer whose destination could not be resolved.
    fn abort(&self, transfer: &Arc<dyn Transfer>, request: PendingRequest, err: DownloadError) {
        let id = transfer.id();
        tracing::warn!(transfer = %id, error = %err, "Aborting download");
        transfer.cancel();
        self.inner.emitter.emit(TransferEvent::TransferRejected {
            id,
            error: err.to_string(),
        });

        if request.is_programmatic() {
            request.reject(err);
        } else {
            let title = request
                .options
                .error_title
                .as_deref()
                .unwrap_or(&self.inner.error_title);
            self.inner.shell.show_error_box(title, &err.user_message());
        }
    }

    fn handle_progress(&self, id: TransferId) {
        let (snapshot, callback, received, total) = {
            let mut state = self.inner.lock();
            let state = &mut *state;
            let Some(tracked) = state.tracked.get_mut(&id) else {
                tracing::debug!(transfer = %id, "Progress for untracked transfer");
                return;
            };
            tracked.state.observe_progress();
            let snapshot = state.progress.on_transfer_progress(tracked.transfer.as_ref());
            if let (Some(window), Some(fraction)) = (tracked.window, snapshot.aggregate) {
                state.progress_windows.insert(window);
                self.set_indicator(window, ProgressBar::Value(fraction));
            }
            (
                snapshot,
                tracked.request.options.on_progress.clone(),
                tracked.transfer.received_bytes(),
                tracked.transfer.total_bytes(),
            )
        };

        if let (Some(callback), Some(fraction)) = (callback, snapshot.item) {
            callback(fraction);
        }

        self.inner
            .emitter
            .emit(TransferEvent::progress(id, received, total));
    }

    fn handle_done(&self, id: TransferId, outcome: TerminalState) {
        let tracked = {
            let mut state = self.inner.lock();
            let Some(tracked) = state.tracked.remove(&id) else {
                tracing::warn!(transfer = %id, outcome = %outcome, "Terminal notification for untracked transfer");
                return;
            };
            if state.progress.on_transfer_terminal(tracked.transfer.as_ref()) {
                for window in std::mem::take(&mut state.progress_windows) {
                    self.set_indicator(window, ProgressBar::Clear);
                }
            }
            tracked
        };

        self.inner.dispatcher.dispatch(FinishedTransfer {
            transfer: tracked.transfer,
            request: tracked.request,
            outcome,
            destination: tracked.destination,
        });
    }

    /// Push `progress` to `window` unless the window is gone. Called with the
    /// state lock held.
    fn set_indicator(&self, window: WindowId, progress: ProgressBar) {
        if self.inner.shell.is_window_alive(window) {
            self.inner.shell.set_progress_bar(window, progress);
        }
    }
}

fn will_download_listener(weak: Weak<Inner>) -> WillDownloadListener {
    Arc::new(move |transfer, window| {
        if let Some(inner) = weak.upgrade() {
            Coordinator { inner }.handle_will_download(transfer, window);
        }
    })
}
