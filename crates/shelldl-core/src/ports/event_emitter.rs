//! Transfer event emitter port.
//!
//! This port abstracts transfer event emission, allowing the coordinator to
//! publish lifecycle events without coupling to transport details (logs,
//! IPC to a renderer, JSON lines on stdout, etc.).

use crate::transfer::TransferEvent;

/// Port for emitting transfer events.
///
/// Implementations handle the actual event delivery. `emit` is called from
/// notification handlers and must not block.
pub trait TransferEventEmitterPort: Send + Sync {
    /// Emit a transfer event.
    fn emit(&self, event: TransferEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn TransferEventEmitterPort>` without
    /// requiring the underlying type to implement Clone.
    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort>;
}

/// A no-op transfer event emitter for tests and hosts without listeners.
#[derive(Debug, Clone, Default)]
pub struct NoopTransferEmitter;

impl NoopTransferEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TransferEventEmitterPort for NoopTransferEmitter {
    fn emit(&self, _event: TransferEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferId;
    use std::sync::Arc;

    #[test]
    fn test_noop_emitter() {
        let emitter = NoopTransferEmitter::new();

        // Should not panic
        emitter.emit(TransferEvent::progress(TransferId(1), 1, 2));
    }

    #[test]
    fn test_arc_emitter_clone_box() {
        let emitter: Arc<dyn TransferEventEmitterPort> = Arc::new(NoopTransferEmitter::new());
        let boxed = emitter.clone_box();
        boxed.emit(TransferEvent::progress(TransferId(1), 0, 0));
    }
}
