//! Filename derivation for generated target paths.
//!
//! Precedence: Content-Disposition header, then the embedder's suggested
//! filename, then a MIME-specific fallback, then the last URL path segment,
//! then the default filename. The winning candidate is sanitized before use.

mod content_disposition;
mod sanitize;

pub use content_disposition::filename_from_content_disposition;
pub use sanitize::sanitize_filename;

/// Used when nothing at all can be derived.
const DEFAULT_FILENAME: &str = "download";

/// Derives the filename for a download with no forced path.
pub fn generate_filename(
    url: &str,
    content_disposition: Option<&str>,
    suggested_filename: Option<&str>,
    mime_type: Option<&str>,
) -> String {
    let candidate = content_disposition
        .and_then(filename_from_content_disposition)
        .or_else(|| {
            suggested_filename
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .or_else(|| mime_type.and_then(filename_for_mime).map(str::to_string))
        .or_else(|| filename_from_url(url));

    let raw = match candidate {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let clean = sanitize_filename(&raw);
    if clean.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        clean
    }
}

/// Well-known filenames for MIME types whose URLs rarely carry one.
fn filename_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "application/x-x509-user-cert" => Some("user.crt"),
        "application/x-x509-ca-cert" => Some("ca.crt"),
        _ => None,
    }
}

/// Last non-empty URL path segment, if usable as a filename hint.
fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .next_back()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
