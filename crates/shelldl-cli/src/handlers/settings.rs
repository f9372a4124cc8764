//! `settings` command.

use serde_json::json;
use shelldl_core::Settings;

use crate::error::CliError;

/// Effective settings after defaults are filled in.
pub fn effective(settings: &Settings) -> Result<serde_json::Value, CliError> {
    Ok(json!({
        "download_dir": settings.effective_download_dir()?,
        "error_title": settings.effective_error_title(),
        "error_message": settings.effective_error_message(),
        "reject_duplicate_requests": settings.effective_reject_duplicates(),
    }))
}

pub fn execute(settings: &Settings) -> Result<(), CliError> {
    let value = effective(settings)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&value).map_err(|e| CliError::Io(e.to_string()))?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_effective_fills_defaults() {
        let settings = Settings {
            download_dir: Some(PathBuf::from("/tmp/dl")),
            ..Settings::with_defaults()
        };
        let value = effective(&settings).unwrap();
        assert_eq!(value["download_dir"], "/tmp/dl");
        assert_eq!(value["error_title"], "Download Error");
        assert_eq!(value["reject_duplicate_requests"], true);
    }
}
