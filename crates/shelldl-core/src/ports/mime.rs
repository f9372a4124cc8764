//! MIME-to-extension lookup port.

/// Maps a MIME type to the file extensions registered for it.
pub trait MimeLookup: Send + Sync {
    /// Extensions without the leading dot. Empty when the type is unknown.
    fn extensions(&self, mime: &str) -> Vec<String>;
}
