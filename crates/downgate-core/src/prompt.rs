//! Save-location confirmation collaborator.

use std::path::PathBuf;

/// Inputs for the native save dialog.
#[derive(Debug, Clone)]
pub struct SaveDialogSettings {
    /// Shown in the dialog title; the coordinator passes the source URL.
    pub title: String,
    /// Pre-filled path, already conflict-resolved.
    pub default_path: PathBuf,
}

/// Presents a save dialog. Synchronous from the caller's view; `None` means
/// the user cancelled, which removes the download.
pub trait SavePrompt: Send {
    fn show_save_dialog(&self, settings: SaveDialogSettings) -> Option<PathBuf>;
}
