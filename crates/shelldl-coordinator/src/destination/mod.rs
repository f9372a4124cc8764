//! Destination path resolution.
//!
//! Turns a transfer's suggested filename and MIME type plus the request's
//! options into the absolute path the host should write to.
//!
//! # Policy
//!
//! 1. An explicit `filename` always wins: `directory/filename`, no inference,
//!    no collision check (an existing file is overwritten).
//! 2. `save_as` defers the choice to the host's interactive prompt.
//! 3. Otherwise the suggested name gets an inferred extension when it has
//!    none and the MIME type maps to exactly one, then a free `name (n).ext`
//!    variant is probed for.

mod unused;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shelldl_core::ports::{MimeLookup, PathProbe};
use shelldl_core::{DownloadError, DownloadOptions};

pub use unused::unused_path;

/// Name used when the host suggests an empty filename.
const FALLBACK_FILENAME: &str = "download";

/// Where a transfer should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write to this path.
    Fixed(PathBuf),
    /// Let the host prompt the user.
    Prompt,
}

impl Destination {
    /// The fixed path, if one was chosen.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Fixed(path) => Some(path),
            Self::Prompt => None,
        }
    }
}

/// Computes destinations for transfers.
///
/// Stateless apart from its collaborators; safe to share between threads.
#[derive(Clone)]
pub struct DestinationResolver {
    default_dir: PathBuf,
    mime: Arc<dyn MimeLookup>,
    probe: Arc<dyn PathProbe>,
}

impl DestinationResolver {
    /// Create a resolver writing into `default_dir` unless a request names a directory.
    pub fn new(
        default_dir: impl Into<PathBuf>,
        mime: Arc<dyn MimeLookup>,
        probe: Arc<dyn PathProbe>,
    ) -> Self {
        Self {
            default_dir: default_dir.into(),
            mime,
            probe,
        }
    }

    pub fn default_dir(&self) -> &Path {
        &self.default_dir
    }

    /// Resolve the destination for a transfer.
    ///
    /// Fails only when probing the filesystem fails.
    pub fn resolve(
        &self,
        suggested_filename: &str,
        mime_type: &str,
        options: &DownloadOptions,
    ) -> Result<Destination, DownloadError> {
        let dir = options.directory.as_deref().unwrap_or(&self.default_dir);

        if let Some(filename) = &options.filename {
            return Ok(Destination::Fixed(dir.join(filename)));
        }

        if options.save_as {
            return Ok(Destination::Prompt);
        }

        let name = self.candidate_name(suggested_filename, mime_type);
        unused_path(&dir.join(name), self.probe.as_ref()).map(Destination::Fixed)
    }

    /// The suggested filename, with an extension appended when the MIME type
    /// names exactly one.
    pub fn candidate_name(&self, suggested_filename: &str, mime_type: &str) -> String {
        let name = if suggested_filename.is_empty() {
            FALLBACK_FILENAME
        } else {
            suggested_filename
        };

        if Path::new(name).extension().is_some() {
            return name.to_string();
        }

        let essence = mime_essence(mime_type);
        if essence.is_empty() {
            return name.to_string();
        }

        match self.mime.extensions(&essence).as_slice() {
            [ext] => format!("{name}.{ext}"),
            _ => name.to_string(),
        }
    }
}

/// Strip MIME parameters and normalize case: `Text/Plain; charset=utf-8` -> `text/plain`.
fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::eq;
    use std::collections::HashSet;
    use std::io;
    use std::sync::Mutex;

    mock! {
        Mime {}
        impl MimeLookup for Mime {
            fn extensions(&self, mime: &str) -> Vec<String>;
        }
    }

    /// Probe answering from a fixed set of taken paths.
    struct TakenPaths(Mutex<HashSet<PathBuf>>);

    impl TakenPaths {
        fn new(paths: &[&str]) -> Self {
            Self(Mutex::new(paths.iter().map(PathBuf::from).collect()))
        }
    }

    impl PathProbe for TakenPaths {
        fn exists(&self, path: &Path) -> io::Result<bool> {
            Ok(self.0.lock().unwrap().contains(path))
        }
    }

    struct DeniedProbe;

    impl PathProbe for DeniedProbe {
        fn exists(&self, _path: &Path) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn resolver(mime: MockMime, taken: &[&str]) -> DestinationResolver {
        DestinationResolver::new("/downloads", Arc::new(mime), Arc::new(TakenPaths::new(taken)))
    }

    #[test]
    fn explicit_filename_skips_inference_and_collisions() {
        let mut mime = MockMime::new();
        mime.expect_extensions().never();
        let resolver = resolver(mime, &["/out/report"]);

        let options = DownloadOptions::new().directory("/out").filename("report");
        let dest = resolver.resolve("ignored.bin", "application/pdf", &options).unwrap();

        assert_eq!(dest, Destination::Fixed(PathBuf::from("/out/report")));
    }

    #[test]
    fn explicit_filename_beats_save_as() {
        let resolver = resolver(MockMime::new(), &[]);
        let options = DownloadOptions::new().filename("a.txt").save_as(true);

        let dest = resolver.resolve("b.txt", "text/plain", &options).unwrap();
        assert_eq!(dest.path(), Some(Path::new("/downloads/a.txt")));
    }

    #[test]
    fn save_as_defers_to_prompt() {
        let resolver = resolver(MockMime::new(), &[]);
        let options = DownloadOptions::new().save_as(true);

        let dest = resolver.resolve("b.txt", "text/plain", &options).unwrap();
        assert_eq!(dest, Destination::Prompt);
    }

    #[test]
    fn collision_gets_disambiguated() {
        let resolver = resolver(MockMime::new(), &["/downloads/report.pdf"]);

        let dest = resolver
            .resolve("report.pdf", "application/pdf", &DownloadOptions::new())
            .unwrap();
        assert_eq!(dest.path(), Some(Path::new("/downloads/report (1).pdf")));
    }

    #[test]
    fn single_extension_is_inferred() {
        let mut mime = MockMime::new();
        mime.expect_extensions()
            .with(eq("application/pdf"))
            .returning(|_| vec!["pdf".to_string()]);
        let resolver = resolver(mime, &[]);

        let dest = resolver
            .resolve("report", "application/pdf", &DownloadOptions::new())
            .unwrap();
        assert_eq!(dest.path(), Some(Path::new("/downloads/report.pdf")));
    }

    #[test]
    fn ambiguous_or_unknown_mime_leaves_name() {
        let mut mime = MockMime::new();
        mime.expect_extensions()
            .with(eq("image/jpeg"))
            .returning(|_| vec!["jpeg".to_string(), "jpg".to_string()]);
        mime.expect_extensions()
            .with(eq("application/x-nothing"))
            .returning(|_| Vec::new());
        let resolver = resolver(mime, &[]);

        assert_eq!(resolver.candidate_name("photo", "image/jpeg"), "photo");
        assert_eq!(resolver.candidate_name("blob", "application/x-nothing"), "blob");
    }

    #[test]
    fn mime_parameters_are_ignored() {
        let mut mime = MockMime::new();
        mime.expect_extensions()
            .with(eq("text/csv"))
            .returning(|_| vec!["csv".to_string()]);
        let resolver = resolver(mime, &[]);

        assert_eq!(
            resolver.candidate_name("export", "Text/CSV; charset=utf-8"),
            "export.csv"
        );
    }

    #[test]
    fn existing_extension_is_kept() {
        let mut mime = MockMime::new();
        mime.expect_extensions().never();
        let resolver = resolver(mime, &[]);

        assert_eq!(resolver.candidate_name("notes.md", "text/plain"), "notes.md");
    }

    #[test]
    fn empty_suggestion_falls_back() {
        let mut mime = MockMime::new();
        mime.expect_extensions().returning(|_| Vec::new());
        let resolver = resolver(mime, &[]);

        assert_eq!(resolver.candidate_name("", "application/octet-stream"), "download");
    }

    #[test]
    fn probe_failure_is_destination_error() {
        let resolver = DestinationResolver::new(
            "/locked",
            Arc::new(MockMime::new()),
            Arc::new(DeniedProbe),
        );

        let err = resolver
            .resolve("a.zip", "application/zip", &DownloadOptions::new())
            .unwrap_err();
        assert!(matches!(err, DownloadError::DestinationResolution { .. }));
    }
}
