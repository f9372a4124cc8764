//! Shared harness for coordinator integration tests.
//!
//! Wires a coordinator to the in-memory host, a recording shell and an event
//! collector, writing into a temporary downloads directory.

#![allow(dead_code)]

use std::sync::Arc;

use shelldl_coordinator::adapters::memory::{
    MemorySession, MemoryTransfer, MemoryTransferBuilder, MemoryWindow, RecordingShell,
    StaticMimeTable,
};
use shelldl_coordinator::adapters::{CollectingEmitter, FsPathProbe};
use shelldl_coordinator::{Coordinator, CoordinatorDeps, Settings, build_coordinator};
use shelldl_core::ports::PathProbe;
use shelldl_core::{SessionId, TransferId, WindowId};
use tempfile::TempDir;

pub const WINDOW: WindowId = WindowId(1);

pub struct Harness {
    pub coordinator: Coordinator,
    pub shell: Arc<RecordingShell>,
    pub events: CollectingEmitter,
    pub session: Arc<MemorySession>,
    pub window: Arc<MemoryWindow>,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::custom(Settings::with_defaults(), Arc::new(FsPathProbe), RecordingShell::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::custom(settings, Arc::new(FsPathProbe), RecordingShell::default())
    }

    pub fn custom(mut settings: Settings, probe: Arc<dyn PathProbe>, shell: RecordingShell) -> Self {
        let dir = tempfile::tempdir().unwrap();
        if settings.download_dir.is_none() {
            settings.download_dir = Some(dir.path().to_path_buf());
        }

        let shell = Arc::new(shell);
        let events = CollectingEmitter::new();
        let coordinator = build_coordinator(CoordinatorDeps {
            shell: shell.clone(),
            emitter: Arc::new(events.clone()),
            mime: Arc::new(
                StaticMimeTable::default()
                    .with("application/pdf", &["pdf"])
                    .with("image/jpeg", &["jpg", "jpeg", "jpe"]),
            ),
            probe,
            settings,
        })
        .unwrap();

        let session = MemorySession::new(SessionId(1));
        let window = MemoryWindow::new(WINDOW, session.clone());

        Self {
            coordinator,
            shell,
            events,
            session,
            window,
            dir,
        }
    }

    pub fn transfer(&self, id: u64, url: &str) -> MemoryTransferBuilder {
        MemoryTransfer::builder(TransferId(id), url)
    }

    /// Have the host announce `transfer` in the harness window.
    pub fn start(&self, transfer: &Arc<MemoryTransfer>) {
        self.session.start_transfer(transfer.clone(), Some(WINDOW));
    }

    /// Report `received` bytes for `transfer`.
    pub fn progress(&self, transfer: &MemoryTransfer, received: u64) {
        transfer.set_received(received);
        transfer.emit_updated();
    }
}
