//! Danger classification vocabulary and the verdict gate building blocks.
//!
//! `Verdict` is what the asynchronous safety checker reports; `DangerLevel`
//! is the static file-type heuristic; `DangerType` is the download's current
//! risk label consumed by the UI and the blocking policy. The reconciliation
//! between the three lives in [`reconcile`].

pub mod cache;
pub mod file_type;
pub mod reconcile;

pub use cache::{BeginOrJoin, CompletionCallback, VerdictCache};
pub use file_type::{danger_level_for_path, neutralize_resource_name};
pub use reconcile::{
    content_check_outcome, danger_type_for_url_verdict, reconcile, should_block, ReconcilePolicy,
};

/// Outcome of an asynchronous safety scan of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    /// The check failed or was inconclusive.
    Unknown,
    Dangerous,
    Uncommon,
    DangerousHost,
    PotentiallyUnwanted,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::Unknown => "unknown",
            Verdict::Dangerous => "dangerous",
            Verdict::Uncommon => "uncommon",
            Verdict::DangerousHost => "dangerous-host",
            Verdict::PotentiallyUnwanted => "potentially-unwanted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "safe" => Some(Verdict::Safe),
            "unknown" => Some(Verdict::Unknown),
            "dangerous" => Some(Verdict::Dangerous),
            "uncommon" => Some(Verdict::Uncommon),
            "dangerous-host" => Some(Verdict::DangerousHost),
            "potentially-unwanted" => Some(Verdict::PotentiallyUnwanted),
            _ => None,
        }
    }
}

/// Static danger heuristic for a file type, independent of any scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerLevel {
    NotDangerous,
    /// Fine when the user asked for it; suspicious as a drive-by.
    AllowOnUserGesture,
    /// The type always requires explicit consent, even after a clean scan.
    RequiresExplicitConsent,
}

impl DangerLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DangerLevel::NotDangerous => "not-dangerous",
            DangerLevel::AllowOnUserGesture => "allow-on-user-gesture",
            DangerLevel::RequiresExplicitConsent => "requires-explicit-consent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not-dangerous" => Some(DangerLevel::NotDangerous),
            "allow-on-user-gesture" => Some(DangerLevel::AllowOnUserGesture),
            "requires-explicit-consent" => Some(DangerLevel::RequiresExplicitConsent),
            _ => None,
        }
    }
}

/// Current danger classification of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerType {
    NotDangerous,
    /// Placeholder while a content check for a suspicious type is pending.
    MaybeDangerousContent,
    DangerousFile,
    DangerousContent,
    UncommonContent,
    DangerousHost,
    PotentiallyUnwanted,
    DangerousUrl,
}

impl DangerType {
    pub fn as_str(self) -> &'static str {
        match self {
            DangerType::NotDangerous => "not-dangerous",
            DangerType::MaybeDangerousContent => "maybe-dangerous-content",
            DangerType::DangerousFile => "dangerous-file",
            DangerType::DangerousContent => "dangerous-content",
            DangerType::UncommonContent => "uncommon-content",
            DangerType::DangerousHost => "dangerous-host",
            DangerType::PotentiallyUnwanted => "potentially-unwanted",
            DangerType::DangerousUrl => "dangerous-url",
        }
    }

    /// True while the classification may still be raised by a content check.
    /// An already escalated type is never reclassified by reconciliation.
    pub fn is_overridable(self) -> bool {
        matches!(
            self,
            DangerType::NotDangerous | DangerType::MaybeDangerousContent
        )
    }
}

/// Reason a download was stopped before landing on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    /// Blocked by the danger policy; the transfer layer must not finalize.
    FileBlocked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_str_roundtrip() {
        for v in [
            Verdict::Safe,
            Verdict::Unknown,
            Verdict::Dangerous,
            Verdict::Uncommon,
            Verdict::DangerousHost,
            Verdict::PotentiallyUnwanted,
        ] {
            assert_eq!(Verdict::parse(v.as_str()), Some(v));
        }
        assert_eq!(Verdict::parse("bogus"), None);
    }

    #[test]
    fn danger_level_str_roundtrip() {
        for l in [
            DangerLevel::NotDangerous,
            DangerLevel::AllowOnUserGesture,
            DangerLevel::RequiresExplicitConsent,
        ] {
            assert_eq!(DangerLevel::parse(l.as_str()), Some(l));
        }
    }

    #[test]
    fn overridable_types() {
        assert!(DangerType::NotDangerous.is_overridable());
        assert!(DangerType::MaybeDangerousContent.is_overridable());
        assert!(!DangerType::DangerousFile.is_overridable());
        assert!(!DangerType::DangerousContent.is_overridable());
        assert!(!DangerType::DangerousUrl.is_overridable());
    }
}
