//! Request correlation table.
//!
//! Maps a normalized origin URL to the programmatic request waiting for it.
//! A request is inserted before the host is asked to download the URL and is
//! taken out again when the matching "transfer started" notification arrives.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use shelldl_core::{DownloadError, DownloadOptions, DownloadResult};

use crate::coordinator::TransferHandle;

/// Sending half of a caller's future. Set once, then closed.
type Settlement = oneshot::Sender<DownloadResult<TransferHandle>>;

/// Normalize a URL into a correlation key by percent-decoding it.
///
/// The host may report the origin URL with different percent-encoding than
/// the caller used; both sides decode before comparing.
pub fn normalize_key(url: &str) -> Result<String, DownloadError> {
    urlencoding::decode(url)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| DownloadError::invalid_url(url, e.to_string()))
}

/// A caller's expectation of a future transfer.
///
/// A passive request (no caller) has no settlement; resolving or rejecting
/// it does nothing.
pub(crate) struct PendingRequest {
    pub(crate) options: DownloadOptions,
    settlement: Option<Settlement>,
}

impl PendingRequest {
    /// A request with a caller waiting on `settlement`.
    pub(crate) const fn programmatic(options: DownloadOptions, settlement: Settlement) -> Self {
        Self {
            options,
            settlement: Some(settlement),
        }
    }

    /// The null request used for transfers nobody asked for.
    pub(crate) const fn passive(options: DownloadOptions) -> Self {
        Self {
            options,
            settlement: None,
        }
    }

    pub(crate) const fn is_programmatic(&self) -> bool {
        self.settlement.is_some()
    }

    /// Whether the caller stopped waiting (dropped its future).
    fn is_abandoned(&self) -> bool {
        self.settlement.as_ref().is_some_and(oneshot::Sender::is_closed)
    }

    /// Settle with success.
    pub(crate) fn resolve(self, handle: TransferHandle) {
        self.settle(Ok(handle));
    }

    /// Settle with failure.
    pub(crate) fn reject(self, error: DownloadError) {
        self.settle(Err(error));
    }

    fn settle(self, result: DownloadResult<TransferHandle>) {
        if let Some(tx) = self.settlement {
            if tx.send(result).is_err() {
                tracing::debug!("Caller dropped its pending download before settlement");
            }
        }
    }
}

/// Pending requests keyed by normalized origin URL.
pub(crate) struct RequestTable {
    entries: HashMap<String, PendingRequest>,
    reject_duplicates: bool,
    passive_defaults: DownloadOptions,
}

impl RequestTable {
    pub(crate) fn new(reject_duplicates: bool) -> Self {
        Self {
            entries: HashMap::new(),
            reject_duplicates,
            passive_defaults: DownloadOptions::default(),
        }
    }

    /// Options used for transfers without a registered request.
    pub(crate) fn set_passive_defaults(&mut self, options: DownloadOptions) {
        self.passive_defaults = options;
    }

    /// Insert a request for `key`.
    ///
    /// If a caller is still waiting on the same key the new request is
    /// refused, unless duplicates are allowed, in which case the older
    /// request is dropped and its caller observes `Abandoned`.
    pub(crate) fn register(
        &mut self,
        key: String,
        request: PendingRequest,
    ) -> Result<(), DownloadError> {
        if let Some(existing) = self.entries.get(&key) {
            if self.reject_duplicates && !existing.is_abandoned() {
                tracing::warn!(key = %key, "Refusing duplicate download request");
                return Err(DownloadError::already_pending(key));
            }
            tracing::debug!(key = %key, "Replacing earlier download request");
        }
        self.entries.insert(key, request);
        Ok(())
    }

    /// Remove and return the request for `key`, or a passive request with
    /// the default options if none was registered.
    pub(crate) fn take_and_clear(&mut self, key: &str) -> PendingRequest {
        self.entries
            .remove(key)
            .unwrap_or_else(|| PendingRequest::passive(self.passive_defaults.clone()))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Future returned by `Coordinator::start_download`.
///
/// Resolves exactly once: with the transfer handle when the transfer
/// completes, or with the error that ended the request.
#[must_use = "a pending download does nothing unless awaited"]
pub struct PendingDownload {
    state: PendingState,
}

enum PendingState {
    Waiting(oneshot::Receiver<DownloadResult<TransferHandle>>),
    Ready(Option<DownloadResult<TransferHandle>>),
}

impl PendingDownload {
    pub(crate) const fn waiting(rx: oneshot::Receiver<DownloadResult<TransferHandle>>) -> Self {
        Self {
            state: PendingState::Waiting(rx),
        }
    }

    /// A download that failed before the host was asked to start it.
    pub(crate) const fn failed(error: DownloadError) -> Self {
        Self {
            state: PendingState::Ready(Some(Err(error))),
        }
    }
}

impl Future for PendingDownload {
    type Output = DownloadResult<TransferHandle>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            PendingState::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|received| received.unwrap_or(Err(DownloadError::Abandoned))),
            PendingState::Ready(result) => {
                Poll::Ready(result.take().unwrap_or(Err(DownloadError::Abandoned)))
            }
        }
    }
}
