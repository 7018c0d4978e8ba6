//! Safety-checker collaborator interface.
//!
//! The checker scans elsewhere (thread pool, separate process) and reports
//! back through the control channel. Its presence is a runtime capability:
//! the coordinator takes an `Option<Arc<dyn SafetyChecker>>`, and the absent
//! branch is a real, tested code path rather than a compile-time flag.

use std::path::PathBuf;

use crate::control::ControlHandle;
use crate::download::DownloadId;
use crate::verdict::Verdict;

/// What the checker needs to scan one download. Plain data: the checker
/// never borrows the download record itself.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub id: DownloadId,
    pub url: String,
    pub target_path: Option<PathBuf>,
}

/// Callback for URL-only checks, which run before a download object exists.
pub type UrlCheckCallback = Box<dyn FnOnce(Verdict) + Send>;

/// Asynchronous safety scanner.
pub trait SafetyChecker: Send + Sync {
    /// Scan a download. Exactly one [`ControlEvent::CheckDone`] for
    /// `request.id` must be posted through `reply`, on whatever thread the
    /// checker finishes on; the handle marshals it to the control thread.
    ///
    /// [`ControlEvent::CheckDone`]: crate::control::ControlEvent::CheckDone
    fn check_download(&self, request: CheckRequest, reply: ControlHandle);

    /// Check a bare URL. Independent of any per-download state; the callback
    /// fires exactly once on the checker's own context.
    fn check_url(&self, url: &str, on_result: UrlCheckCallback);
}
