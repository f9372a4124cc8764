//! Transfer event emitters.

use std::sync::{Arc, Mutex, PoisonError};

use shelldl_core::TransferEvent;
use shelldl_core::ports::TransferEventEmitterPort;

/// Writes every event to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventEmitter;

impl TransferEventEmitterPort for TracingEventEmitter {
    fn emit(&self, event: TransferEvent) {
        match &event {
            TransferEvent::TransferProgress {
                id,
                received,
                total,
                ..
            } => tracing::trace!(transfer = %id, received, total, "transfer progress"),
            TransferEvent::TransferStarted { id, url, .. } => {
                tracing::debug!(transfer = %id, url = %url, "transfer started");
            }
            TransferEvent::TransferFinished { id, state, .. } => {
                tracing::debug!(transfer = %id, state = %state, "transfer finished");
            }
            TransferEvent::TransferRejected { id, error } => {
                tracing::debug!(transfer = %id, error = %error, "transfer rejected");
            }
        }
    }

    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort> {
        Box::new(*self)
    }
}

/// Keeps every emitted event in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CollectingEmitter {
    events: Arc<Mutex<Vec<TransferEvent>>>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far.
    pub fn events(&self) -> Vec<TransferEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the events emitted so far.
    pub fn drain(&self) -> Vec<TransferEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl TransferEventEmitterPort for CollectingEmitter {
    fn emit(&self, event: TransferEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort> {
        Box::new(self.clone())
    }
}

/// Forwards every event to each target, in the order they were added.
#[derive(Clone, Default)]
pub struct FanoutEmitter {
    targets: Vec<Arc<dyn TransferEventEmitterPort>>,
}

impl FanoutEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, target: impl TransferEventEmitterPort + 'static) -> Self {
        self.targets.push(Arc::new(target));
        self
    }
}

impl TransferEventEmitterPort for FanoutEmitter {
    fn emit(&self, event: TransferEvent) {
        for target in &self.targets {
            target.emit(event.clone());
        }
    }

    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort> {
        Box::new(self.clone())
    }
}
