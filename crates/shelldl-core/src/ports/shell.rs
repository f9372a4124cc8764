//! OS shell integration port.
//!
//! Covers the window progress indicator, the dock "download finished" bounce,
//! revealing files in the file manager and the blocking error box.

use std::path::Path;

use crate::transfer::{ProgressBar, WindowId};

/// Port for OS-facing side effects.
///
/// Implementations must not block except for `show_error_box`, which is
/// modal on most platforms.
pub trait ShellPort: Send + Sync {
    /// Whether the window still exists. Progress updates to a destroyed
    /// window are skipped.
    fn is_window_alive(&self, window: WindowId) -> bool;

    /// Set or clear the window's progress indicator.
    fn set_progress_bar(&self, window: WindowId, progress: ProgressBar);

    /// Whether the platform has a dock "download finished" API.
    fn supports_dock(&self) -> bool {
        false
    }

    /// Notify the dock that a file finished downloading.
    fn dock_download_finished(&self, _path: &Path) {}

    /// Reveal a file in the platform file manager.
    fn show_item_in_folder(&self, path: &Path);

    /// Show a blocking error notification.
    fn show_error_box(&self, title: &str, message: &str);
}

/// A shell that discards every call.
///
/// Suitable for headless hosts and tests that don't observe side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopShell;

impl ShellPort for NoopShell {
    fn is_window_alive(&self, _window: WindowId) -> bool {
        true
    }

    fn set_progress_bar(&self, _window: WindowId, _progress: ProgressBar) {}

    fn show_item_in_folder(&self, _path: &Path) {}

    fn show_error_box(&self, _title: &str, _message: &str) {}
}
