//! Filesystem path probe.

use std::io;
use std::path::Path;

use shelldl_core::ports::PathProbe;

/// Probes the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPathProbe;

impl PathProbe for FsPathProbe {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }
}
