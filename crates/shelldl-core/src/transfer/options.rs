//! Per-request download options.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Rejection message for a cancelled transfer.
pub const CANCELLED_MESSAGE: &str = "The download has been cancelled";

/// Callback receiving the item-local progress fraction in `[0, 1]`.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Options attached to a programmatic download request.
///
/// Every field is optional. The empty value is what passive downloads use:
/// no explicit filename, the default downloads directory, no save-as prompt.
#[derive(Clone, Default)]
pub struct DownloadOptions {
    /// Destination directory. Falls back to the configured downloads folder.
    pub directory: Option<PathBuf>,
    /// Explicit destination filename. Disables extension inference and
    /// collision avoidance, so an existing file may be overwritten.
    pub filename: Option<String>,
    /// Let the host ask the user where to save.
    pub save_as: bool,
    /// Reveal the finished file in the file manager.
    pub open_folder_when_done: bool,
    /// Invoked on each progress notification with the item-local fraction.
    pub on_progress: Option<ProgressCallback>,
    /// Template for the interrupted message, `{filename}` is substituted.
    pub error_message: Option<String>,
    /// Title of the interrupted-state error box.
    pub error_title: Option<String>,
}

impl DownloadOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub const fn save_as(mut self, save_as: bool) -> Self {
        self.save_as = save_as;
        self
    }

    #[must_use]
    pub const fn open_folder_when_done(mut self, open: bool) -> Self {
        self.open_folder_when_done = open;
        self
    }

    #[must_use]
    pub fn on_progress(mut self, callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn error_message(mut self, template: impl Into<String>) -> Self {
        self.error_message = Some(template.into());
        self
    }

    #[must_use]
    pub fn error_title(mut self, title: impl Into<String>) -> Self {
        self.error_title = Some(title.into());
        self
    }
}

impl fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("directory", &self.directory)
            .field("filename", &self.filename)
            .field("save_as", &self.save_as)
            .field("open_folder_when_done", &self.open_folder_when_done)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .field("error_message", &self.error_message)
            .field("error_title", &self.error_title)
            .finish()
    }
}

/// Substitute `{filename}` in an error message template.
///
/// Other placeholders are left untouched.
#[must_use]
pub fn render_error_message(template: &str, filename: &str) -> String {
    template.replace("{filename}", filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DEFAULT_ERROR_MESSAGE;

    #[test]
    fn test_default_template() {
        assert_eq!(
            render_error_message(DEFAULT_ERROR_MESSAGE, "video.mp4"),
            "The download of video.mp4 was interrupted"
        );
    }

    #[test]
    fn test_unknown_placeholders_kept() {
        assert_eq!(
            render_error_message("{filename} failed ({reason})", "a.zip"),
            "a.zip failed ({reason})"
        );
    }

    #[test]
    fn test_builder_and_debug() {
        let options = DownloadOptions::new()
            .directory("/tmp/out")
            .filename("report.pdf")
            .open_folder_when_done(true)
            .on_progress(|_| {});

        assert_eq!(options.filename.as_deref(), Some("report.pdf"));
        assert!(options.open_folder_when_done);
        assert!(!options.save_as);

        let debug = format!("{options:?}");
        assert!(debug.contains("<callback>"));
    }
}
