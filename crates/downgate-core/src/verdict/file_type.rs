//! Static file-type danger heuristics.

use std::path::Path;

use super::DangerLevel;

/// Extension appended to neutralize a suspicious save-package resource name.
const NEUTRAL_EXTENSION: &str = "download";

/// Static danger level for a target path, decided by extension alone.
///
/// This is the heuristic consulted before and alongside the asynchronous
/// content check; it never looks at the file contents.
pub fn danger_level_for_path(path: &Path) -> DangerLevel {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_ascii_lowercase(),
        None => return DangerLevel::NotDangerous,
    };
    match ext.as_str() {
        // Directly executable or script-host formats: always require consent.
        "exe" | "msi" | "bat" | "cmd" | "com" | "scr" | "pif" | "vbs" | "hta" => {
            DangerLevel::RequiresExplicitConsent
        }
        // Runnable but commonly downloaded on purpose.
        "sh" | "js" | "jar" | "deb" | "rpm" | "apk" => DangerLevel::AllowOnUserGesture,
        _ => DangerLevel::NotDangerous,
    }
}

/// Defangs a save-package resource filename.
///
/// Resources saved alongside a page must not land on disk under an
/// executable name; anything with a non-clean static level gets a harmless
/// extension appended (`page.exe` → `page.exe.download`).
pub fn neutralize_resource_name(name: &str) -> String {
    if danger_level_for_path(Path::new(name)) == DangerLevel::NotDangerous {
        return name.to_string();
    }
    format!("{name}.{NEUTRAL_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executables_require_consent() {
        for name in ["setup.exe", "SETUP.EXE", "install.msi", "run.bat", "x.scr"] {
            assert_eq!(
                danger_level_for_path(Path::new(name)),
                DangerLevel::RequiresExplicitConsent,
                "{name}"
            );
        }
    }

    #[test]
    fn gesture_level_types() {
        for name in ["install.sh", "app.jar", "pkg.deb", "tool.apk"] {
            assert_eq!(
                danger_level_for_path(Path::new(name)),
                DangerLevel::AllowOnUserGesture,
                "{name}"
            );
        }
    }

    #[test]
    fn plain_files_are_clean() {
        for name in ["report.pdf", "notes.txt", "archive.tar.gz", "no_extension"] {
            assert_eq!(
                danger_level_for_path(Path::new(name)),
                DangerLevel::NotDangerous,
                "{name}"
            );
        }
    }

    #[test]
    fn neutralize_only_suspicious_names() {
        assert_eq!(neutralize_resource_name("page.html"), "page.html");
        assert_eq!(neutralize_resource_name("page.exe"), "page.exe.download");
        assert_eq!(neutralize_resource_name("setup.sh"), "setup.sh.download");
    }
}
