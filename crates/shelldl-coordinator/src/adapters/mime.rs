//! MIME lookup backed by `mime_guess`.

use shelldl_core::ports::MimeLookup;

/// Looks up extensions in the `mime_guess` tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeGuessLookup;

impl MimeLookup for MimeGuessLookup {
    fn extensions(&self, mime: &str) -> Vec<String> {
        mime_guess::get_mime_extensions_str(mime)
            .map(|exts| exts.iter().map(|ext| (*ext).to_string()).collect())
            .unwrap_or_default()
    }
}
