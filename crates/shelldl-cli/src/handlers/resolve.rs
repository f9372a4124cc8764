//! `resolve` command.

use std::path::PathBuf;
use std::sync::Arc;

use shelldl_coordinator::adapters::{FsPathProbe, MimeGuessLookup};
use shelldl_coordinator::{Destination, DestinationResolver};
use shelldl_core::{DownloadOptions, Settings};

use crate::error::CliError;

/// Arguments for `resolve`.
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    pub suggested_filename: String,
    pub mime_type: String,
    pub directory: Option<PathBuf>,
    pub filename: Option<String>,
    pub save_as: bool,
}

/// Resolve a destination against the real filesystem.
pub fn resolve(settings: &Settings, args: ResolveArgs) -> Result<Destination, CliError> {
    let resolver = DestinationResolver::new(
        settings.effective_download_dir()?,
        Arc::new(MimeGuessLookup),
        Arc::new(FsPathProbe),
    );

    let mut options = DownloadOptions::new().save_as(args.save_as);
    if let Some(directory) = args.directory {
        options = options.directory(directory);
    }
    if let Some(filename) = args.filename {
        options = options.filename(filename);
    }

    Ok(resolver.resolve(&args.suggested_filename, &args.mime_type, &options)?)
}

pub fn execute(settings: &Settings, args: ResolveArgs) -> Result<(), CliError> {
    match resolve(settings, args)? {
        Destination::Fixed(path) => println!("{}", path.display()),
        Destination::Prompt => println!("<prompt>"),
    }
    Ok(())
}
