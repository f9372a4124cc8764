//! Filesystem probe port.

use std::io;
use std::path::Path;

/// Checks whether a candidate destination is already taken.
///
/// Probe-then-use: the answer is not a reservation, two transfers may race
/// for the same free name.
pub trait PathProbe: Send + Sync {
    /// `Ok(false)` when nothing exists at `path`. Errors other than
    /// "not found" (e.g. permission denied) are returned as-is.
    fn exists(&self, path: &Path) -> io::Result<bool>;
}
