//! Collision avoidance for destination paths.

use std::path::{Path, PathBuf};

use shelldl_core::DownloadError;
use shelldl_core::ports::PathProbe;

/// Find a path that does not exist yet, starting with `path` itself.
///
/// Taken paths are disambiguated as `name (1).ext`, `name (2).ext`, ...
/// A name that already ends in ` (k)` continues counting from `k + 1`.
pub fn unused_path(path: &Path, probe: &dyn PathProbe) -> Result<PathBuf, DownloadError> {
    if !is_taken(path, probe)? {
        return Ok(path.to_path_buf());
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let (base, mut counter) = split_counter(&stem);
    loop {
        let candidate = parent.join(format!("{base} ({counter}){ext}"));
        if !is_taken(&candidate, probe)? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

fn is_taken(path: &Path, probe: &dyn PathProbe) -> Result<bool, DownloadError> {
    probe
        .exists(path)
        .map_err(|e| DownloadError::destination(path, &e))
}

/// `"report (3)"` -> `("report", 4)`, anything else -> `(stem, 1)`.
fn split_counter(stem: &str) -> (&str, u64) {
    let parsed = stem
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once(" ("))
        .and_then(|(base, digits)| {
            let all_digits = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
            if base.is_empty() || !all_digits {
                return None;
            }
            digits.parse::<u64>().ok().map(|n| (base, n.saturating_add(1)))
        });
    parsed.unwrap_or((stem, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct DiskProbe;

    impl PathProbe for DiskProbe {
        fn exists(&self, path: &Path) -> io::Result<bool> {
            path.try_exists()
        }
    }

    #[test]
    fn free_path_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        assert_eq!(unused_path(&path, &DiskProbe).unwrap(), path);
    }

    #[test]
    fn taken_paths_are_numbered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.pdf"), b"1").unwrap();
        std::fs::write(dir.path().join("report (1).pdf"), b"2").unwrap();

        let chosen = unused_path(&dir.path().join("report.pdf"), &DiskProbe).unwrap();
        assert_eq!(chosen, dir.path().join("report (2).pdf"));
        assert!(!chosen.exists());
    }

    #[test]
    fn names_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE"), b"").unwrap();

        let chosen = unused_path(&dir.path().join("LICENSE"), &DiskProbe).unwrap();
        assert_eq!(chosen, dir.path().join("LICENSE (1)"));
    }

    #[test]
    fn existing_counter_continues() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report (3).pdf"), b"").unwrap();

        let chosen = unused_path(&dir.path().join("report (3).pdf"), &DiskProbe).unwrap();
        assert_eq!(chosen, dir.path().join("report (4).pdf"));
    }

    #[test]
    fn split_counter_cases() {
        assert_eq!(split_counter("report (3)"), ("report", 4));
        assert_eq!(split_counter("report"), ("report", 1));
        assert_eq!(split_counter("report (x)"), ("report (x)", 1));
        assert_eq!(split_counter(" (2)"), (" (2)", 1));
    }
}
