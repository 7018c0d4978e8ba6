//! Reconciliation of scan verdicts with static danger heuristics.
//!
//! Pure functions only: the coordinator applies the results to the download
//! record. Precedence rules:
//! - a clean scan does not clear a type that always requires consent
//! - an inconclusive scan plus any static suspicion escalates (fail closed)
//! - an inconclusive scan with no static signal stays clean (fail open,
//!   configurable via [`ReconcilePolicy`])
//! - explicit checker verdicts map 1:1 regardless of static level
//! - an already escalated classification is never downgraded here

use super::{DangerLevel, DangerType, InterruptReason, Verdict};

/// Tunable corner of the reconciliation table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcilePolicy {
    /// Escalate (Unknown, NotDangerous) to DangerousFile instead of keeping
    /// it clean. Off by default.
    pub escalate_inconclusive_clean: bool,
}

/// Maps (scan verdict, static level, current classification) to the final
/// danger classification for a download.
pub fn reconcile(
    verdict: Verdict,
    level: DangerLevel,
    current: DangerType,
    policy: ReconcilePolicy,
) -> DangerType {
    if !current.is_overridable() {
        return current;
    }
    match verdict {
        Verdict::Safe => {
            if level == DangerLevel::RequiresExplicitConsent {
                DangerType::DangerousFile
            } else {
                DangerType::NotDangerous
            }
        }
        Verdict::Unknown => {
            if level != DangerLevel::NotDangerous || policy.escalate_inconclusive_clean {
                DangerType::DangerousFile
            } else {
                DangerType::NotDangerous
            }
        }
        Verdict::Dangerous => DangerType::DangerousContent,
        Verdict::Uncommon => DangerType::UncommonContent,
        Verdict::DangerousHost => DangerType::DangerousHost,
        Verdict::PotentiallyUnwanted => DangerType::PotentiallyUnwanted,
    }
}

/// Whether a classification prevents the file from landing on disk at all.
pub fn should_block(danger: DangerType) -> bool {
    matches!(
        danger,
        DangerType::DangerousContent | DangerType::DangerousFile | DangerType::DangerousUrl
    )
}

/// The (reported danger type, interrupt reason) pair to apply for a final
/// classification. A blocked file reports NotDangerous — a dangerous type
/// would take precedence over the blocking — and carries the FileBlocked
/// interrupt instead.
pub fn content_check_outcome(danger: DangerType) -> (DangerType, Option<InterruptReason>) {
    if should_block(danger) {
        (DangerType::NotDangerous, Some(InterruptReason::FileBlocked))
    } else {
        (danger, None)
    }
}

/// Maps a URL-check verdict to a danger type. Anything beyond Safe/Unknown
/// marks the source URL itself as dangerous.
pub fn danger_type_for_url_verdict(verdict: Verdict) -> DangerType {
    match verdict {
        Verdict::Safe | Verdict::Unknown => DangerType::NotDangerous,
        _ => DangerType::DangerousUrl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: ReconcilePolicy = ReconcilePolicy {
        escalate_inconclusive_clean: false,
    };

    fn rec(v: Verdict, l: DangerLevel) -> DangerType {
        reconcile(v, l, DangerType::NotDangerous, POLICY)
    }

    #[test]
    fn safe_scan_still_flags_consent_types() {
        assert_eq!(
            rec(Verdict::Safe, DangerLevel::RequiresExplicitConsent),
            DangerType::DangerousFile
        );
        assert_eq!(
            rec(Verdict::Safe, DangerLevel::AllowOnUserGesture),
            DangerType::NotDangerous
        );
        assert_eq!(
            rec(Verdict::Safe, DangerLevel::NotDangerous),
            DangerType::NotDangerous
        );
    }

    #[test]
    fn inconclusive_scan_fails_closed_with_static_suspicion() {
        assert_eq!(
            rec(Verdict::Unknown, DangerLevel::AllowOnUserGesture),
            DangerType::DangerousFile
        );
        assert_eq!(
            rec(Verdict::Unknown, DangerLevel::RequiresExplicitConsent),
            DangerType::DangerousFile
        );
    }

    #[test]
    fn inconclusive_scan_fails_open_without_signal() {
        assert_eq!(
            rec(Verdict::Unknown, DangerLevel::NotDangerous),
            DangerType::NotDangerous
        );
    }

    #[test]
    fn inconclusive_escalation_is_configurable() {
        let strict = ReconcilePolicy {
            escalate_inconclusive_clean: true,
        };
        assert_eq!(
            reconcile(
                Verdict::Unknown,
                DangerLevel::NotDangerous,
                DangerType::NotDangerous,
                strict
            ),
            DangerType::DangerousFile
        );
    }

    #[test]
    fn explicit_verdicts_map_one_to_one() {
        for level in [
            DangerLevel::NotDangerous,
            DangerLevel::AllowOnUserGesture,
            DangerLevel::RequiresExplicitConsent,
        ] {
            assert_eq!(rec(Verdict::Dangerous, level), DangerType::DangerousContent);
            assert_eq!(rec(Verdict::Uncommon, level), DangerType::UncommonContent);
            assert_eq!(rec(Verdict::DangerousHost, level), DangerType::DangerousHost);
            assert_eq!(
                rec(Verdict::PotentiallyUnwanted, level),
                DangerType::PotentiallyUnwanted
            );
        }
    }

    #[test]
    fn escalated_classification_is_never_downgraded() {
        let current = DangerType::DangerousUrl;
        assert_eq!(
            reconcile(Verdict::Safe, DangerLevel::NotDangerous, current, POLICY),
            DangerType::DangerousUrl
        );
        let maybe = DangerType::MaybeDangerousContent;
        assert_eq!(
            reconcile(Verdict::Safe, DangerLevel::NotDangerous, maybe, POLICY),
            DangerType::NotDangerous,
            "the soft placeholder is overridable"
        );
    }

    #[test]
    fn blocking_policy() {
        assert!(should_block(DangerType::DangerousContent));
        assert!(should_block(DangerType::DangerousFile));
        assert!(should_block(DangerType::DangerousUrl));
        assert!(!should_block(DangerType::UncommonContent));
        assert!(!should_block(DangerType::PotentiallyUnwanted));
        assert!(!should_block(DangerType::DangerousHost));
        assert!(!should_block(DangerType::NotDangerous));
        assert!(!should_block(DangerType::MaybeDangerousContent));
    }

    #[test]
    fn blocked_outcome_reports_clean_with_interrupt() {
        assert_eq!(
            content_check_outcome(DangerType::DangerousContent),
            (DangerType::NotDangerous, Some(InterruptReason::FileBlocked))
        );
        assert_eq!(
            content_check_outcome(DangerType::UncommonContent),
            (DangerType::UncommonContent, None)
        );
    }

    #[test]
    fn url_verdict_mapping() {
        assert_eq!(
            danger_type_for_url_verdict(Verdict::Safe),
            DangerType::NotDangerous
        );
        assert_eq!(
            danger_type_for_url_verdict(Verdict::Unknown),
            DangerType::NotDangerous
        );
        assert_eq!(
            danger_type_for_url_verdict(Verdict::Dangerous),
            DangerType::DangerousUrl
        );
        assert_eq!(
            danger_type_for_url_verdict(Verdict::DangerousHost),
            DangerType::DangerousUrl
        );
    }
}
