//! Integration tests for transfers nobody asked for.
//!
//! In passive mode the coordinator handles every transfer of an attached
//! session with default options. Outcomes are reported through events and
//! the shell only.

mod common;

use std::io;
use std::path::Path;
use std::sync::Arc;

use common::{Harness, WINDOW};
use shelldl_coordinator::adapters::memory::{MemoryApp, MemorySession, RecordingShell};
use shelldl_coordinator::{DownloadOptions, Settings, TerminalState, TransferEvent};
use shelldl_core::{SessionId, WindowId};
use shelldl_core::ports::{PathProbe, Transfer};

fn started_count(h: &Harness) -> usize {
    h.events
        .events()
        .iter()
        .filter(|event| matches!(event, TransferEvent::TransferStarted { .. }))
        .count()
}

#[test]
fn unmatched_transfer_is_handled_passively() {
    let h = Harness::new();
    h.coordinator.attach(h.session.clone());

    let transfer = h
        .transfer(1, "https://example.com/a.zip")
        .suggested_filename("a.zip")
        .total_bytes(10)
        .build();
    h.start(&transfer);
    h.progress(&transfer, 10);
    transfer.finish(TerminalState::Completed);

    assert_eq!(transfer.save_path(), Some(h.dir.path().join("a.zip")));
    assert!(matches!(
        h.events.events().first(),
        Some(TransferEvent::TransferStarted {
            programmatic: false,
            ..
        })
    ));
    assert!(matches!(
        h.events.events().last(),
        Some(TransferEvent::TransferFinished {
            state: TerminalState::Completed,
            ..
        })
    ));
}

#[test]
fn passive_interruption_shows_error_box() {
    let h = Harness::with_settings(Settings {
        error_title: Some("Oops".to_string()),
        ..Settings::with_defaults()
    });
    h.coordinator.attach(h.session.clone());

    let transfer = h.transfer(1, "https://example.com/a.zip").suggested_filename("a.zip").build();
    h.start(&transfer);
    transfer.finish(TerminalState::Interrupted);

    assert_eq!(
        h.shell.error_boxes(),
        vec![(
            "Oops".to_string(),
            "The download of a.zip was interrupted".to_string()
        )]
    );
}

#[test]
fn double_attach_handles_each_transfer_once() {
    let h = Harness::new();
    assert!(h.coordinator.attach(h.session.clone()));
    assert!(!h.coordinator.attach(h.session.clone()));

    // Programmatic calls on the same session do not add listeners either.
    let _a = h.coordinator.start_download(
        h.window.as_ref(),
        "https://example.com/x",
        DownloadOptions::new(),
    );
    let _b = h.coordinator.start_download(
        h.window.as_ref(),
        "https://example.com/y",
        DownloadOptions::new(),
    );
    assert_eq!(h.session.listener_count(), 1);
    assert_eq!(h.coordinator.attached_sessions(), 1);

    let transfer = h.transfer(1, "https://example.com/z.zip").suggested_filename("z.zip").build();
    h.start(&transfer);
    assert_eq!(started_count(&h), 1);
}

#[test]
fn detached_session_is_ignored() {
    let h = Harness::new();
    h.coordinator.attach(h.session.clone());
    assert!(h.coordinator.detach(SessionId(1)));
    assert!(!h.coordinator.detach(SessionId(1)));

    let transfer = h.transfer(1, "https://example.com/a.zip").suggested_filename("a.zip").build();
    h.start(&transfer);

    assert_eq!(transfer.save_path(), None);
    assert!(h.events.events().is_empty());
}

#[test]
fn passive_defaults_apply_to_unmatched_transfers() {
    let h = Harness::new();
    let target = tempfile::tempdir().unwrap();
    h.coordinator.set_passive_defaults(
        DownloadOptions::new()
            .directory(target.path())
            .open_folder_when_done(true),
    );
    h.coordinator.attach(h.session.clone());

    let transfer = h.transfer(1, "https://example.com/a.zip").suggested_filename("a.zip").build();
    h.start(&transfer);
    transfer.finish(TerminalState::Completed);

    let path = target.path().join("a.zip");
    assert_eq!(transfer.save_path(), Some(path.clone()));
    assert!(h.shell.calls().contains(
        &shelldl_coordinator::adapters::memory::ShellCall::ShowItemInFolder(path)
    ));
}

#[test]
fn windowless_transfer_skips_indicator() {
    let h = Harness::new();
    h.coordinator.attach(h.session.clone());

    let transfer = h
        .transfer(1, "https://example.com/a.zip")
        .suggested_filename("a.zip")
        .total_bytes(4)
        .build();
    h.session.start_transfer(transfer.clone(), None);
    h.progress(&transfer, 2);
    transfer.finish(TerminalState::Completed);

    // No owning window: nothing to draw on.
    assert!(h.shell.progress_updates(WINDOW).is_empty());
    assert!(h.coordinator.counters().is_zero());
}

#[test]
fn app_lifecycle_attaches_and_detaches() {
    let h = Harness::new();
    let app = MemoryApp::new();
    h.coordinator.enable_passive(app.as_ref());

    let other = MemorySession::new(SessionId(2));
    app.create_session(h.session.clone());
    app.create_session(other.clone());
    assert_eq!(h.coordinator.attached_sessions(), 2);

    let transfer = h.transfer(1, "https://example.com/a.zip").suggested_filename("a.zip").build();
    other.start_transfer(transfer.clone(), None);
    assert_eq!(started_count(&h), 1);

    app.quit();
    assert_eq!(h.coordinator.attached_sessions(), 0);
    assert_eq!(other.listener_count(), 0);
}

struct BrokenProbe;

impl PathProbe for BrokenProbe {
    fn exists(&self, _path: &Path) -> io::Result<bool> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    }
}

#[test]
fn passive_destination_failure_shows_error_box() {
    let h = Harness::custom(
        Settings::with_defaults(),
        Arc::new(BrokenProbe),
        RecordingShell::default(),
    );
    h.coordinator.attach(h.session.clone());

    let transfer = h.transfer(1, "https://example.com/a.zip").suggested_filename("a.zip").build();
    h.start(&transfer);

    assert!(transfer.is_cancelled());
    let boxes = h.shell.error_boxes();
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].0, "Download Error");
    assert!(boxes[0].1.starts_with("Could not choose where to save"));
}

#[test]
fn passive_destination_failure_uses_passive_title() {
    let h = Harness::custom(
        Settings::with_defaults(),
        Arc::new(BrokenProbe),
        RecordingShell::default(),
    );
    h.coordinator
        .set_passive_defaults(DownloadOptions::new().error_title("Save failed"));
    h.coordinator.attach(h.session.clone());

    let transfer = h.transfer(1, "https://example.com/a.zip").suggested_filename("a.zip").build();
    h.start(&transfer);

    let boxes = h.shell.error_boxes();
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].0, "Save failed");
}

#[test]
fn closing_requesting_window_keeps_passive_handling() {
    let h = Harness::new();
    let app = MemoryApp::new();
    h.coordinator.enable_passive(app.as_ref());
    app.create_session(h.session.clone());

    let _pending = h.coordinator.start_download(
        h.window.as_ref(),
        "https://example.com/requested.zip",
        DownloadOptions::new(),
    );
    h.window.close();
    assert!(h.coordinator.is_attached(SessionId(1)));

    // Another window of the same session starts an unrequested download.
    let transfer = h.transfer(1, "https://example.com/a.zip").suggested_filename("a.zip").build();
    h.session.start_transfer(transfer.clone(), Some(WindowId(2)));

    assert_eq!(transfer.save_path(), Some(h.dir.path().join("a.zip")));
    assert_eq!(started_count(&h), 1);
}
