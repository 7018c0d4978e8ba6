//! Download records owned by the transfer subsystem.
//!
//! The coordinator never owns a [`Download`]; it borrows one by id from the
//! [`DownloadManager`] and re-fetches it after every suspension point.

mod manager;

pub use manager::DownloadManager;

use std::path::PathBuf;

use crate::verdict::{DangerLevel, DangerType, InterruptReason};

/// Stable numeric download id, unique for the lifetime of the owning session.
pub type DownloadId = u32;

/// High-level download lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    InProgress,
    Interrupted,
    Complete,
    Cancelled,
}

impl DownloadState {
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadState::InProgress => "in-progress",
            DownloadState::Interrupted => "interrupted",
            DownloadState::Complete => "complete",
            DownloadState::Cancelled => "cancelled",
        }
    }
}

/// Inputs known when a transfer starts.
#[derive(Debug, Clone, Default)]
pub struct DownloadRequest {
    pub url: String,
    pub suggested_filename: Option<String>,
    pub mime_type: Option<String>,
    pub content_disposition: Option<String>,
    /// Caller-mandated target path; skips filename generation and conflict
    /// handling entirely.
    pub forced_path: Option<PathBuf>,
}

/// One in-flight or finished download.
#[derive(Debug)]
pub struct Download {
    pub id: DownloadId,
    pub url: String,
    pub state: DownloadState,
    pub danger_type: DangerType,
    /// Static file-type level, filled in at target determination.
    pub danger_level: DangerLevel,
    pub interrupt_reason: Option<InterruptReason>,
    /// Final destination decided by the coordinator.
    pub target_path: Option<PathBuf>,
    pub forced_path: Option<PathBuf>,
    /// Save path set through the embedder API before target determination;
    /// suppresses the save dialog.
    pub save_path: Option<PathBuf>,
    pub suggested_filename: Option<String>,
    pub mime_type: Option<String>,
    pub content_disposition: Option<String>,
}

impl Download {
    fn new(id: DownloadId, request: DownloadRequest) -> Self {
        Self {
            id,
            url: request.url,
            state: DownloadState::InProgress,
            danger_type: DangerType::NotDangerous,
            danger_level: DangerLevel::NotDangerous,
            interrupt_reason: None,
            target_path: None,
            forced_path: request.forced_path,
            save_path: None,
            suggested_filename: request.suggested_filename,
            mime_type: request.mime_type,
            content_disposition: request.content_disposition,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == DownloadState::InProgress
    }

    /// Applies the outcome of a content check. A FileBlocked interrupt also
    /// interrupts the transfer so nothing lands on disk.
    pub fn apply_content_check(
        &mut self,
        danger: DangerType,
        interrupt: Option<InterruptReason>,
    ) {
        self.danger_type = danger;
        self.interrupt_reason = interrupt;
        if interrupt == Some(InterruptReason::FileBlocked) {
            self.state = DownloadState::Interrupted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_download_starts_clean_and_in_progress() {
        let d = Download::new(
            1,
            DownloadRequest {
                url: "https://example.com/file.zip".into(),
                ..Default::default()
            },
        );
        assert!(d.is_in_progress());
        assert_eq!(d.danger_type, DangerType::NotDangerous);
        assert!(d.target_path.is_none());
        assert!(d.interrupt_reason.is_none());
    }

    #[test]
    fn blocked_content_check_interrupts_transfer() {
        let mut d = Download::new(2, DownloadRequest::default());
        d.apply_content_check(
            DangerType::NotDangerous,
            Some(InterruptReason::FileBlocked),
        );
        assert_eq!(d.state, DownloadState::Interrupted);
        assert_eq!(d.danger_type, DangerType::NotDangerous);
        assert_eq!(d.interrupt_reason, Some(InterruptReason::FileBlocked));
    }

    #[test]
    fn flagged_content_check_keeps_transfer_running() {
        let mut d = Download::new(3, DownloadRequest::default());
        d.apply_content_check(DangerType::UncommonContent, None);
        assert!(d.is_in_progress());
        assert_eq!(d.danger_type, DangerType::UncommonContent);
    }
}
