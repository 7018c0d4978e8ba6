//! Filename sanitization for the local filesystem.

/// Linux NAME_MAX.
const MAX_LEN: usize = 255;

/// Makes a derived filename safe to place in the download directory.
///
/// Path separators, NUL, control characters, and whitespace become `_`
/// (runs collapsed); leading and trailing dots, spaces, and underscores are
/// trimmed; the result is clipped to 255 bytes on a char boundary. May
/// return an empty string, which the caller replaces with the default name.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let mapped = match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() || c == ' ' || c == '\t' => '_',
            c => c,
        };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_matches(|c| matches!(c, '.' | ' ' | '_'));
    if trimmed.len() <= MAX_LEN {
        return trimmed.to_string();
    }
    let mut cut = MAX_LEN;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    trimmed[..cut].to_string()
}
