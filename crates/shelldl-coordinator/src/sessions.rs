//! Session registry.
//!
//! Guarantees at most one "transfer started" listener per host session, no
//! matter how many windows share the session or how often they attach.
//!
//! A subscription stays installed while anything still needs it: an explicit
//! (passive) attach, or at least one open window that requested a download
//! through it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shelldl_core::ports::{HostSession, SubscriptionId, WillDownloadListener};
use shelldl_core::{SessionId, WindowId};

struct Registration {
    session: Arc<dyn HostSession>,
    subscription: SubscriptionId,
    passive: bool,
    windows: HashSet<WindowId>,
}

impl Registration {
    fn into_detached(self) -> Detached {
        Detached {
            session: self.session,
            subscription: self.subscription,
        }
    }
}

/// A subscription removed from the registry but not yet from the host.
#[must_use = "the host keeps the listener until `cancel` is called"]
pub(crate) struct Detached {
    session: Arc<dyn HostSession>,
    subscription: SubscriptionId,
}

impl Detached {
    /// Remove the listener from the host session.
    pub(crate) fn cancel(self) {
        let id = self.session.id();
        self.session.remove_listener(self.subscription);
        tracing::debug!(session = %id, "Detached download listener");
    }
}

/// Sessions the coordinator is listening to.
#[derive(Default)]
pub(crate) struct SessionRegistry {
    sessions: HashMap<SessionId, Registration>,
}

impl SessionRegistry {
    /// Subscribe to `session` for passive handling.
    ///
    /// The subscription then outlives every window of the session.
    /// `listener` is only built when a subscription is actually installed.
    /// Returns `true` if this call installed it.
    pub(crate) fn attach(
        &mut self,
        session: Arc<dyn HostSession>,
        listener: impl FnOnce() -> WillDownloadListener,
    ) -> bool {
        let (registration, installed) = self.entry(session, listener);
        registration.passive = true;
        installed
    }

    /// Subscribe to `session` on behalf of `window`.
    ///
    /// Returns `true` the first time `window` is recorded, so the caller
    /// hooks the window's close notification once.
    pub(crate) fn attach_window(
        &mut self,
        session: Arc<dyn HostSession>,
        window: WindowId,
        listener: impl FnOnce() -> WillDownloadListener,
    ) -> bool {
        let (registration, _) = self.entry(session, listener);
        registration.windows.insert(window)
    }

    fn entry(
        &mut self,
        session: Arc<dyn HostSession>,
        listener: impl FnOnce() -> WillDownloadListener,
    ) -> (&mut Registration, bool) {
        let id = session.id();
        let mut installed = false;
        let registration = self.sessions.entry(id).or_insert_with(|| {
            installed = true;
            let subscription = session.on_will_download(listener());
            tracing::debug!(session = %id, "Attached download listener");
            Registration {
                session,
                subscription,
                passive: false,
                windows: HashSet::new(),
            }
        });
        (registration, installed)
    }

    /// Forget `window`. The subscription is removed once no window and no
    /// passive attach needs it.
    pub(crate) fn release_window(&mut self, id: SessionId, window: WindowId) -> Option<Detached> {
        let registration = self.sessions.get_mut(&id)?;
        registration.windows.remove(&window);
        if registration.passive || !registration.windows.is_empty() {
            return None;
        }
        self.sessions.remove(&id).map(Registration::into_detached)
    }

    /// Remove the subscription for `id` regardless of who needs it.
    pub(crate) fn detach(&mut self, id: SessionId) -> Option<Detached> {
        self.sessions.remove(&id).map(Registration::into_detached)
    }

    /// Remove every subscription.
    pub(crate) fn detach_all(&mut self) -> Vec<Detached> {
        self.sessions
            .drain()
            .map(|(_, registration)| registration.into_detached())
            .collect()
    }

    pub(crate) fn is_attached(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }
}
