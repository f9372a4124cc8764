//! Terminal state dispatch.
//!
//! Applies the side effects of a finished transfer and settles the request
//! that was waiting for it. Every outcome goes through one exhaustive match.

use std::path::PathBuf;
use std::sync::Arc;

use shelldl_core::ports::{ShellPort, Transfer, TransferEventEmitterPort};
use shelldl_core::{DownloadError, TerminalState, TransferEvent, render_error_message};

use crate::coordinator::TransferHandle;
use crate::correlation::PendingRequest;

/// A transfer that just reached a terminal state, with everything needed to
/// finish it off.
pub(crate) struct FinishedTransfer {
    pub(crate) transfer: Arc<dyn Transfer>,
    pub(crate) request: PendingRequest,
    pub(crate) outcome: TerminalState,
    /// Destination the coordinator chose, `None` when the user was prompted.
    pub(crate) destination: Option<PathBuf>,
}

/// Applies terminal side effects and settles requests.
pub(crate) struct TerminalDispatcher {
    shell: Arc<dyn ShellPort>,
    emitter: Arc<dyn TransferEventEmitterPort>,
    error_title: String,
    error_message: String,
}

impl TerminalDispatcher {
    pub(crate) fn new(
        shell: Arc<dyn ShellPort>,
        emitter: Arc<dyn TransferEventEmitterPort>,
        error_title: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            shell,
            emitter,
            error_title: error_title.into(),
            error_message: error_message.into(),
        }
    }

    pub(crate) fn dispatch(&self, finished: FinishedTransfer) {
        let FinishedTransfer {
            transfer,
            request,
            outcome,
            destination,
        } = finished;
        let id = transfer.id();
        // The host knows the final path when the user picked it.
        let path = transfer.save_path().or(destination);

        match outcome {
            TerminalState::Interrupted => {
                let template = request
                    .options
                    .error_message
                    .as_deref()
                    .unwrap_or(&self.error_message);
                let title = request
                    .options
                    .error_title
                    .as_deref()
                    .unwrap_or(&self.error_title);
                let message = render_error_message(template, &transfer.suggested_filename());

                tracing::warn!(transfer = %id, message = %message, "Download interrupted");
                self.shell.show_error_box(title, &message);
                self.emitter.emit(TransferEvent::finished(
                    id,
                    outcome,
                    path,
                    Some(message.clone()),
                ));
                request.reject(DownloadError::interrupted(message));
            }
            TerminalState::Cancelled => {
                tracing::info!(transfer = %id, "Download cancelled");
                self.emitter
                    .emit(TransferEvent::finished(id, outcome, path, None));
                request.reject(DownloadError::Cancelled);
            }
            TerminalState::Completed => {
                if let Some(path) = &path {
                    if self.shell.supports_dock() {
                        self.shell.dock_download_finished(path);
                    }
                    if request.options.open_folder_when_done {
                        self.shell.show_item_in_folder(path);
                    }
                }

                tracing::info!(
                    transfer = %id,
                    path = ?path,
                    bytes = transfer.total_bytes(),
                    "Download completed"
                );
                self.emitter
                    .emit(TransferEvent::finished(id, outcome, path.clone(), None));
                request.resolve(TransferHandle::new(transfer, path));
            }
        }
    }
}
