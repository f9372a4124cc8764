//! Aggregate progress bookkeeping.
//!
//! Tracks the active transfer set and the process-wide byte counters of the
//! current batch. A batch spans from the first transfer start until the
//! active set is empty again, at which point every counter returns to zero.
//!
//! # Invariants
//!
//! - `total_bytes` is the sum of the totals of every transfer started in the batch
//! - `received_bytes` is `completed_bytes` plus the received bytes of the
//!   active transfers, as of the last progress notification
//! - an empty active set means all counters are zero

use std::collections::HashMap;
use std::sync::Arc;

use shelldl_core::ports::Transfer;
use shelldl_core::{AggregateCounters, TransferId};

/// Fractions computed for one progress notification.
///
/// A fraction is `None` when its denominator is zero (size unknown); the
/// corresponding update is then skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    /// Batch-wide fraction in `[0, 1]` for the window indicator.
    pub aggregate: Option<f64>,
    /// The notifying transfer's own fraction.
    pub item: Option<f64>,
}

/// Active transfers and byte counters of the current batch.
#[derive(Default)]
pub struct ProgressAggregator {
    active: HashMap<TransferId, Arc<dyn Transfer>>,
    counters: AggregateCounters,
}

impl ProgressAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transfer to the batch.
    pub fn on_transfer_start(&mut self, transfer: Arc<dyn Transfer>) {
        self.counters.total_bytes = self
            .counters
            .total_bytes
            .saturating_add(transfer.total_bytes());
        self.active.insert(transfer.id(), transfer);
    }

    /// Recompute received bytes and the fractions to report.
    pub fn on_transfer_progress(&mut self, transfer: &dyn Transfer) -> ProgressSnapshot {
        self.counters.received_bytes = self
            .active
            .values()
            .map(|t| t.received_bytes())
            .fold(self.counters.completed_bytes, u64::saturating_add);

        ProgressSnapshot {
            aggregate: fraction(self.counters.received_bytes, self.counters.total_bytes),
            item: fraction(transfer.received_bytes(), transfer.total_bytes()),
        }
    }

    /// Remove a finished transfer. Returns `true` if this ended the batch.
    ///
    /// Unknown transfers are ignored and never end the batch.
    pub fn on_transfer_terminal(&mut self, transfer: &dyn Transfer) -> bool {
        if self.active.remove(&transfer.id()).is_none() {
            return false;
        }

        self.counters.completed_bytes = self
            .counters
            .completed_bytes
            .saturating_add(transfer.total_bytes());

        if self.active.is_empty() {
            self.counters = AggregateCounters::default();
            return true;
        }
        false
    }

    pub fn counters(&self) -> AggregateCounters {
        self.counters
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// `numerator / denominator` clamped to `[0, 1]`, `None` for an unknown denominator.
#[allow(clippy::cast_precision_loss)]
fn fraction(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| (numerator as f64 / denominator as f64).clamp(0.0, 1.0))
}
