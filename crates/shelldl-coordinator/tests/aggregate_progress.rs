//! Integration tests for batch-wide progress reporting.
//!
//! Several transfers share one window indicator. The indicator shows the
//! received bytes of the whole batch against its total, and is cleared once
//! the last transfer of the batch ends.

mod common;

use common::{Harness, WINDOW};
use shelldl_coordinator::adapters::memory::ShellCall;
use shelldl_coordinator::{AggregateCounters, DownloadOptions, ProgressBar, TerminalState};
use std::sync::{Arc, Mutex};

#[test]
fn aggregate_spans_all_active_transfers() {
    let h = Harness::new();
    h.coordinator.attach(h.session.clone());

    let a = h.transfer(1, "https://example.com/a.bin").suggested_filename("a.bin").total_bytes(100).build();
    let b = h.transfer(2, "https://example.com/b.bin").suggested_filename("b.bin").total_bytes(300).build();
    h.start(&a);
    h.start(&b);

    h.progress(&a, 50);
    h.progress(&b, 150);
    h.progress(&a, 100);

    assert_eq!(
        h.shell.progress_updates(WINDOW),
        vec![
            ProgressBar::Value(0.125),
            ProgressBar::Value(0.5),
            ProgressBar::Value(0.625),
        ]
    );
    assert_eq!(
        h.coordinator.counters(),
        AggregateCounters {
            received_bytes: 250,
            completed_bytes: 0,
            total_bytes: 400,
        }
    );
}

#[test]
fn completed_bytes_carry_over_until_batch_ends() {
    let h = Harness::new();
    h.coordinator.attach(h.session.clone());

    let a = h.transfer(1, "https://example.com/a.bin").suggested_filename("a.bin").total_bytes(100).build();
    let b = h.transfer(2, "https://example.com/b.bin").suggested_filename("b.bin").total_bytes(100).build();
    h.start(&a);
    h.start(&b);

    h.progress(&a, 100);
    a.finish(TerminalState::Completed);
    assert_eq!(h.coordinator.counters().completed_bytes, 100);
    assert_eq!(h.coordinator.active_transfers(), 1);

    h.progress(&b, 50);
    assert_eq!(
        h.shell.progress_updates(WINDOW).last(),
        Some(&ProgressBar::Value(0.75))
    );
}

#[test]
fn batch_end_resets_counters_and_clears_indicator() {
    let h = Harness::new();
    h.coordinator.attach(h.session.clone());

    let a = h.transfer(1, "https://example.com/a.bin").suggested_filename("a.bin").total_bytes(10).build();
    h.start(&a);
    h.progress(&a, 10);
    a.finish(TerminalState::Completed);

    assert!(h.coordinator.counters().is_zero());
    assert_eq!(h.coordinator.active_transfers(), 0);
    assert_eq!(
        h.shell.progress_updates(WINDOW),
        vec![ProgressBar::Value(1.0), ProgressBar::Clear]
    );

    // A fresh batch starts from zero.
    let b = h.transfer(2, "https://example.com/b.bin").suggested_filename("b.bin").total_bytes(40).build();
    h.start(&b);
    h.progress(&b, 10);
    assert_eq!(
        h.shell.progress_updates(WINDOW).last(),
        Some(&ProgressBar::Value(0.25))
    );
}

#[test]
fn unknown_total_skips_indicator() {
    let h = Harness::new();
    h.coordinator.attach(h.session.clone());

    let a = h.transfer(1, "https://example.com/stream").suggested_filename("stream").build();
    h.start(&a);
    h.progress(&a, 1024);

    assert!(h.shell.progress_updates(WINDOW).is_empty());
}

#[test]
fn destroyed_window_still_resets_counters() {
    let h = Harness::new();
    h.coordinator.attach(h.session.clone());

    let a = h.transfer(1, "https://example.com/a.bin").suggested_filename("a.bin").total_bytes(10).build();
    h.start(&a);
    h.progress(&a, 5);
    h.shell.destroy_window(WINDOW);
    h.progress(&a, 10);
    a.finish(TerminalState::Completed);

    assert!(h.coordinator.counters().is_zero());
    assert_eq!(
        h.shell.progress_updates(WINDOW),
        vec![ProgressBar::Value(0.5)]
    );
}

#[tokio::test]
async fn item_progress_reaches_callback() {
    let h = Harness::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = DownloadOptions::new().on_progress(move |fraction| {
        sink.lock().unwrap().push(fraction);
    });

    let pending = h
        .coordinator
        .start_download(h.window.as_ref(), "https://example.com/a.bin", options);
    let a = h.transfer(1, "https://example.com/a.bin").suggested_filename("a.bin").total_bytes(200).build();
    h.start(&a);
    h.progress(&a, 50);
    h.progress(&a, 200);
    a.finish(TerminalState::Completed);

    assert!(pending.await.is_ok());
    assert_eq!(*seen.lock().unwrap(), vec![0.25, 1.0]);
    assert!(h
        .shell
        .calls()
        .iter()
        .any(|call| matches!(call, ShellCall::SetProgressBar { progress: ProgressBar::Clear, .. })));
}
