//! Target path resolution and filesystem reservation.
//!
//! Resolves a download's destination and claims it on disk so two downloads
//! generating the same name cannot collide. A claim is a zero-byte
//! placeholder file; it is released when the [`ReservedPath`] is dropped
//! unclaimed (download cancelled before completion) and kept when ownership
//! is transferred to the download via [`ReservedPath::into_path`].

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Uniquification attempts before giving up on a name.
const MAX_UNIQUE_SUFFIX: u32 = 100;

/// Policy for resolving a filename collision at the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Take the path as-is, replacing any existing file at completion.
    Overwrite,
    /// Append ` (N)` to the stem until the path is free.
    Uniquify,
    /// Resolve like Uniquify, then let the confirmation step ask the user.
    Prompt,
}

/// Why a target path could not be reserved. Surfaced as an outcome code on
/// the target decision, never thrown across the async boundary.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("cannot create download directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot claim {path}: {source}")]
    Claim {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no free name for {path} after {MAX_UNIQUE_SUFFIX} attempts")]
    Exhausted { path: PathBuf },
}

/// Inputs to [`resolve`].
#[derive(Debug)]
pub struct ResolveRequest<'a> {
    /// Caller-mandated path; used as-is with overwrite semantics.
    pub forced_path: Option<&'a Path>,
    /// Directory for generated paths.
    pub default_directory: &'a Path,
    /// Generated filename (ignored when `forced_path` is set).
    pub filename: &'a str,
    pub conflict_action: ConflictAction,
    /// Create `default_directory` if it does not exist.
    pub create_directory: bool,
}

/// A resolved target path, possibly holding a filesystem claim.
#[derive(Debug)]
pub struct ReservedPath {
    path: PathBuf,
    /// True while a placeholder file of ours exists and nobody owns it.
    holds_placeholder: bool,
}

impl ReservedPath {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Transfer ownership of the reservation to the download. The
    /// placeholder stays on disk for the transfer layer to replace.
    pub fn into_path(mut self) -> PathBuf {
        self.holds_placeholder = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ReservedPath {
    fn drop(&mut self) {
        if self.holds_placeholder {
            // Best effort; a leftover empty placeholder is harmless.
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::debug!(path = %self.path.display(), "placeholder release failed: {e}");
            }
        }
    }
}

/// Resolve and reserve the destination for one download.
///
/// Forced paths skip conflict handling and are never claimed on disk; the
/// caller asked for exactly that path and overwrite semantics.
pub fn resolve(request: ResolveRequest<'_>) -> Result<ReservedPath, ReservationError> {
    if let Some(forced) = request.forced_path {
        return Ok(ReservedPath {
            path: forced.to_path_buf(),
            holds_placeholder: false,
        });
    }

    let dir = request.default_directory;
    if request.create_directory {
        std::fs::create_dir_all(dir).map_err(|source| ReservationError::CreateDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let base = dir.join(request.filename);
    match request.conflict_action {
        ConflictAction::Overwrite => Ok(ReservedPath {
            path: base,
            holds_placeholder: false,
        }),
        ConflictAction::Uniquify | ConflictAction::Prompt => claim_unique(&base),
    }
}

/// Claim `base`, or `stem (N).ext` for the first free N.
fn claim_unique(base: &Path) -> Result<ReservedPath, ReservationError> {
    for n in 0..=MAX_UNIQUE_SUFFIX {
        let candidate = if n == 0 {
            base.to_path_buf()
        } else {
            with_suffix(base, n)
        };
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(_) => {
                tracing::debug!(path = %candidate.display(), "reserved target path");
                return Ok(ReservedPath {
                    path: candidate,
                    holds_placeholder: true,
                });
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => {
                return Err(ReservationError::Claim {
                    path: candidate,
                    source,
                })
            }
        }
    }
    Err(ReservationError::Exhausted {
        path: base.to_path_buf(),
    })
}

/// `report.pdf` with suffix 2 → `report (2).pdf`.
fn with_suffix(base: &Path, n: u32) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem} ({n}).{ext}"),
        None => format!("{stem} ({n})"),
    };
    base.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(dir: &'a Path, filename: &'a str) -> ResolveRequest<'a> {
        ResolveRequest {
            forced_path: None,
            default_directory: dir,
            filename,
            conflict_action: ConflictAction::Uniquify,
            create_directory: false,
        }
    }

    #[test]
    fn forced_path_is_returned_unchanged() {
        let forced = Path::new("/x/report.pdf");
        let reserved = resolve(ResolveRequest {
            forced_path: Some(forced),
            default_directory: Path::new("/ignored"),
            filename: "ignored.bin",
            conflict_action: ConflictAction::Overwrite,
            create_directory: false,
        })
        .unwrap();
        assert_eq!(reserved.path(), forced);
        // No placeholder was created for a forced path.
        assert!(!forced.exists());
    }

    #[test]
    fn uniquify_claims_free_name_first() {
        let dir = tempfile::tempdir().unwrap();
        let reserved = resolve(request(dir.path(), "a.txt")).unwrap();
        assert_eq!(reserved.path(), dir.path().join("a.txt"));
        assert!(reserved.path().exists(), "placeholder claimed");
    }

    #[test]
    fn uniquify_steps_past_existing_names() {
        let dir = tempfile::tempdir().unwrap();
        let first = resolve(request(dir.path(), "a.txt")).unwrap();
        let second = resolve(request(dir.path(), "a.txt")).unwrap();
        assert_eq!(first.path(), dir.path().join("a.txt"));
        assert_eq!(second.path(), dir.path().join("a (1).txt"));
        let third = resolve(request(dir.path(), "a.txt")).unwrap();
        assert_eq!(third.path(), dir.path().join("a (2).txt"));
    }

    #[test]
    fn suffix_handles_names_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let _first = resolve(request(dir.path(), "README")).unwrap();
        let second = resolve(request(dir.path(), "README")).unwrap();
        assert_eq!(second.path(), dir.path().join("README (1)"));
    }

    #[test]
    fn drop_releases_unclaimed_reservation() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let reserved = resolve(request(dir.path(), "gone.bin")).unwrap();
            reserved.path().to_path_buf()
        };
        assert!(!path.exists(), "placeholder removed on drop");
    }

    #[test]
    fn into_path_transfers_ownership() {
        let dir = tempfile::tempdir().unwrap();
        let reserved = resolve(request(dir.path(), "kept.bin")).unwrap();
        let path = reserved.into_path();
        assert!(path.exists(), "placeholder survives the transfer");
    }

    #[test]
    fn overwrite_does_not_claim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"existing").unwrap();
        let mut req = request(dir.path(), "a.txt");
        req.conflict_action = ConflictAction::Overwrite;
        let reserved = resolve(req).unwrap();
        assert_eq!(reserved.path(), dir.path().join("a.txt"));
        assert_eq!(
            std::fs::read(dir.path().join("a.txt")).unwrap(),
            b"existing",
            "existing file untouched at reservation time"
        );
    }

    #[test]
    fn create_directory_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub/dir");
        let mut req = request(&nested, "a.txt");
        req.create_directory = true;
        let reserved = resolve(req).unwrap();
        assert!(reserved.path().starts_with(&nested));
    }

    #[test]
    fn missing_directory_fails_as_claim_error() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("absent");
        let err = resolve(request(&nested, "a.txt")).unwrap_err();
        assert!(matches!(err, ReservationError::Claim { .. }));
    }
}
