//! Target decision values and per-download gate phases.

use std::path::PathBuf;

use crate::download::DownloadId;
use crate::verdict::DangerType;

/// Where a download sits in the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Target determination has started.
    TargetPending,
    /// Path resolved; waiting on the save-location confirmation.
    AwaitingConfirmation,
    /// Target decided; completion is gated on the safety verdict.
    VerdictPending,
    /// Verdict applied; completion not yet released.
    Ready,
    /// Completion released to the manager. At most once per download.
    Released,
    /// Terminal: user cancelled or the download vanished.
    Removed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::TargetPending => "target-pending",
            Phase::AwaitingConfirmation => "awaiting-confirmation",
            Phase::VerdictPending => "verdict-pending",
            Phase::Ready => "ready",
            Phase::Released => "released",
            Phase::Removed => "removed",
        }
    }
}

/// How the final path was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetDisposition {
    /// Decided without user interaction.
    Automatic,
    /// A save dialog was shown.
    PromptConfirmed,
}

/// Outcome code for one target determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Success,
    /// The path could not be reserved; caller policy decides removal/retry.
    ReservationFailed,
    /// The user cancelled the save dialog; the download was removed.
    Cancelled,
}

/// The decision produced once per download by target determination.
#[derive(Debug)]
pub struct TargetDecision {
    pub id: DownloadId,
    /// `None` for reservation failure or cancellation.
    pub path: Option<PathBuf>,
    pub disposition: TargetDisposition,
    pub danger: DangerType,
    pub outcome: TargetOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::TargetPending < Phase::AwaitingConfirmation);
        assert!(Phase::AwaitingConfirmation < Phase::VerdictPending);
        assert!(Phase::VerdictPending < Phase::Ready);
        assert!(Phase::Ready < Phase::Released);
    }

    #[test]
    fn phase_names() {
        assert_eq!(Phase::VerdictPending.as_str(), "verdict-pending");
        assert_eq!(Phase::Removed.as_str(), "removed");
    }
}
