//! Handle delivered to a caller whose download completed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use shelldl_core::TransferId;
use shelldl_core::ports::Transfer;

/// A completed transfer.
#[derive(Clone)]
pub struct TransferHandle {
    transfer: Arc<dyn Transfer>,
    path: Option<PathBuf>,
}

impl TransferHandle {
    pub(crate) fn new(transfer: Arc<dyn Transfer>, path: Option<PathBuf>) -> Self {
        Self { transfer, path }
    }

    pub fn id(&self) -> TransferId {
        self.transfer.id()
    }

    /// Where the file was written, if known.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The host's transfer object.
    pub fn transfer(&self) -> &Arc<dyn Transfer> {
        &self.transfer
    }

    /// Origin URL of the transfer.
    pub fn url(&self) -> Option<String> {
        self.transfer.url_chain().into_iter().next()
    }

    pub fn total_bytes(&self) -> u64 {
        self.transfer.total_bytes()
    }
}

impl fmt::Debug for TransferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferHandle")
            .field("id", &self.id())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
