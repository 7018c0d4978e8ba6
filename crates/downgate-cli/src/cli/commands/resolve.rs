//! `downgate resolve <url>` – show the destination a download would get.

use anyhow::{Context, Result};
use downgate_core::config::Preferences;
use downgate_core::filename::generate_filename;
use downgate_core::reserve::{self, ConflictAction, ResolveRequest};
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run_resolve(
    prefs: &dyn Preferences,
    url: &str,
    download_dir: Option<PathBuf>,
    content_disposition: Option<&str>,
    suggested_filename: Option<&str>,
    mime_type: Option<&str>,
    overwrite: bool,
) -> Result<()> {
    let dir = match download_dir.or_else(|| prefs.default_download_dir()) {
        Some(d) => d,
        None => std::env::current_dir().context("cannot determine working directory")?,
    };

    let filename = generate_filename(url, content_disposition, suggested_filename, mime_type);
    let conflict_action = if overwrite {
        ConflictAction::Overwrite
    } else {
        ConflictAction::Uniquify
    };
    let reserved = reserve::resolve(ResolveRequest {
        forced_path: None,
        default_directory: &dir,
        filename: &filename,
        conflict_action,
        create_directory: true,
    })?;

    println!("filename: {filename}");
    println!("path:     {}", reserved.path().display());
    // Dry run: dropping the reservation releases the placeholder.
    Ok(())
}
