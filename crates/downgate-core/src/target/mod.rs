//! Download target determination and the completion gate.
//!
//! The coordinator decides each download's final destination (resolving and
//! reserving the path, confirming it with the user when a prompt collaborator
//! is present) and gates completion on the safety verdict: at most one
//! outstanding check per download, cached outcome, exactly one release. It
//! owns no download; every asynchronous resumption re-fetches the record by
//! id from the [`DownloadManager`], so a download removed mid-flight turns
//! any late callback into a no-op.

mod decision;

pub use decision::{Phase, TargetDecision, TargetDisposition, TargetOutcome};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::checker::{CheckRequest, SafetyChecker, UrlCheckCallback};
use crate::config::Preferences;
use crate::control::{ControlChannel, ControlEvent, ControlHandle};
use crate::download::{DownloadId, DownloadManager};
use crate::filename::generate_filename;
use crate::prompt::{SaveDialogSettings, SavePrompt};
use crate::reserve::{self, ConflictAction, ReservedPath, ResolveRequest};
use crate::verdict::{
    content_check_outcome, danger_level_for_path, danger_type_for_url_verdict, reconcile,
    BeginOrJoin, CompletionCallback, DangerLevel, DangerType, Verdict, VerdictCache,
};

/// Callback receiving the target decision.
pub type TargetCallback = Box<dyn FnOnce(TargetDecision) + Send>;

/// Callback receiving the mapped danger type of a URL-only check.
pub type UrlDangerCallback = Box<dyn FnOnce(DangerType) + Send>;

/// Orchestrates target resolution and the safety-verdict completion gate.
///
/// All methods must run on the control thread; collaborators that finish
/// elsewhere report back through the [`ControlHandle`] and the events are
/// applied by [`pump`](TargetCoordinator::pump) (or
/// [`next_turn`](TargetCoordinator::next_turn)).
pub struct TargetCoordinator {
    control: ControlChannel,
    cache: VerdictCache,
    phases: HashMap<DownloadId, Phase>,
    prefs: Box<dyn Preferences>,
    checker: Option<Arc<dyn SafetyChecker>>,
    prompt: Option<Box<dyn SavePrompt>>,
}

impl TargetCoordinator {
    pub fn new(
        prefs: Box<dyn Preferences>,
        checker: Option<Arc<dyn SafetyChecker>>,
        prompt: Option<Box<dyn SavePrompt>>,
    ) -> Self {
        Self {
            control: ControlChannel::new(),
            cache: VerdictCache::new(),
            phases: HashMap::new(),
            prefs,
            checker,
            prompt,
        }
    }

    /// Handle for collaborators delivering events back to the control thread.
    pub fn handle(&self) -> ControlHandle {
        self.control.handle()
    }

    /// Gate phase for a download, if it has entered the gate.
    pub fn phase(&self, id: DownloadId) -> Option<Phase> {
        self.phases.get(&id).copied()
    }

    /// Decide the final destination for `id` and deliver a [`TargetDecision`].
    ///
    /// An empty result from the save dialog removes the download: terminal,
    /// and no completion is ever signalled for it. Reservation failure is
    /// delivered as an outcome code through the same callback.
    pub fn determine_target(
        &mut self,
        mgr: &mut DownloadManager,
        id: DownloadId,
        on_determined: TargetCallback,
    ) {
        let Some(download) = mgr.get(id) else {
            tracing::debug!(id, "determine_target for unknown download");
            return;
        };
        self.phases.insert(id, Phase::TargetPending);

        let url = download.url.clone();
        let forced = download.forced_path.clone();
        let save_path = download.save_path.clone();
        let filename = generate_filename(
            &url,
            download.content_disposition.as_deref(),
            download.suggested_filename.as_deref(),
            download.mime_type.as_deref(),
        );
        let conflict_action = if forced.is_some() {
            ConflictAction::Overwrite
        } else {
            ConflictAction::Uniquify
        };
        let default_dir = self.download_directory();

        let reserved = match reserve::resolve(ResolveRequest {
            forced_path: forced.as_deref(),
            default_directory: &default_dir,
            filename: &filename,
            conflict_action,
            create_directory: true,
        }) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(id, "path reservation failed: {e}");
                on_determined(TargetDecision {
                    id,
                    path: None,
                    disposition: TargetDisposition::Automatic,
                    danger: DangerType::NotDangerous,
                    outcome: TargetOutcome::ReservationFailed,
                });
                return;
            }
        };

        self.phases.insert(id, Phase::AwaitingConfirmation);
        let (path, disposition) = match self.confirm_path(&url, save_path, reserved) {
            Some(confirmed) => confirmed,
            None => {
                // User cancelled: remove the download, never signal completion.
                tracing::info!(id, "save dialog cancelled, removing download");
                mgr.remove(id);
                self.cache.remove(id);
                self.phases.insert(id, Phase::Removed);
                on_determined(TargetDecision {
                    id,
                    path: None,
                    disposition: TargetDisposition::PromptConfirmed,
                    danger: DangerType::NotDangerous,
                    outcome: TargetOutcome::Cancelled,
                });
                return;
            }
        };

        // The prompt is a suspension point: re-fetch, never trust old state.
        let Some(download) = mgr.get_mut(id) else {
            tracing::debug!(id, "download vanished during confirmation");
            self.phases.insert(id, Phase::Removed);
            return;
        };
        let level = danger_level_for_path(&path);
        let danger = if self.checker.is_some() && level != DangerLevel::NotDangerous {
            DangerType::MaybeDangerousContent
        } else {
            DangerType::NotDangerous
        };
        download.target_path = Some(path.clone());
        download.danger_level = level;
        download.danger_type = danger;
        self.phases.insert(id, Phase::VerdictPending);

        tracing::debug!(id, path = %path.display(), danger = danger.as_str(), "target determined");
        on_determined(TargetDecision {
            id,
            path: Some(path),
            disposition,
            danger,
            outcome: TargetOutcome::Success,
        });
    }

    /// The safe-browsing gate. `true` means the manager may finish the
    /// download now; `false` means the decision is deferred and `on_ready`
    /// (the newest registered continuation for this id) fires once the
    /// verdict resolves.
    pub fn should_complete(
        &mut self,
        mgr: &mut DownloadManager,
        id: DownloadId,
        on_ready: CompletionCallback,
    ) -> bool {
        let Some(download) = mgr.get(id) else {
            tracing::debug!(id, "should_complete for unknown download");
            return false;
        };
        let level = download.danger_level;
        let current = download.danger_type;

        let Some(checker) = self.checker.clone() else {
            return self.readiness_without_checker(mgr, id, level, current, on_ready);
        };

        match self.cache.begin_or_join(id, on_ready) {
            BeginOrJoin::Resolved(verdict, _cb) => {
                tracing::debug!(id, verdict = verdict.as_str(), "verdict already cached");
                self.phases.insert(id, Phase::Released);
                true
            }
            BeginOrJoin::Disabled(_cb) => {
                self.phases.insert(id, Phase::Released);
                true
            }
            BeginOrJoin::Joined => false,
            BeginOrJoin::Start => {
                tracing::debug!(id, "starting safety check");
                let request = CheckRequest {
                    id,
                    url: mgr.get(id).map(|d| d.url.clone()).unwrap_or_default(),
                    target_path: mgr.get(id).and_then(|d| d.target_path.clone()),
                };
                checker.check_download(request, self.control.handle());
                false
            }
        }
    }

    /// Completion readiness when no checker capability is present.
    fn readiness_without_checker(
        &mut self,
        mgr: &mut DownloadManager,
        id: DownloadId,
        level: DangerLevel,
        current: DangerType,
        on_ready: CompletionCallback,
    ) -> bool {
        if self.cache.contains(id) {
            return match self.cache.begin_or_join(id, on_ready) {
                BeginOrJoin::Resolved(..) | BeginOrJoin::Disabled(_) => {
                    self.phases.insert(id, Phase::Released);
                    true
                }
                BeginOrJoin::Joined | BeginOrJoin::Start => false,
            };
        }
        if level == DangerLevel::NotDangerous || !current.is_overridable() {
            self.phases.insert(id, Phase::Released);
            return true;
        }

        // The checker went away between start and now; restore the danger
        // state it would have produced and defer the release one turn.
        tracing::debug!(id, "checker unavailable, classifying from static level");
        let danger = reconcile(Verdict::Unknown, level, current, self.prefs.reconcile_policy());
        let (reported, interrupt) = content_check_outcome(danger);
        if let Some(download) = mgr.get_mut(id) {
            download.apply_content_check(reported, interrupt);
        }
        self.cache.insert_resolved(id, Verdict::Unknown, on_ready);
        self.control.handle().post(ControlEvent::Resume { id });
        false
    }

    /// Permanently bypass safety checks for one download (trusted source).
    /// Must be called before the first `should_complete` for `id`.
    pub fn disable_safety_check(&mut self, id: DownloadId) {
        tracing::debug!(id, "safety checks disabled");
        self.cache.disable(id);
    }

    /// Check a bare URL, independent of any download. The callback receives
    /// the mapped danger type on the checker's context; with no checker the
    /// answer is immediately NotDangerous.
    pub fn check_url(&self, url: &str, on_result: UrlDangerCallback) {
        match &self.checker {
            Some(checker) => {
                let cb: UrlCheckCallback =
                    Box::new(move |verdict| on_result(danger_type_for_url_verdict(verdict)));
                checker.check_url(url, cb);
            }
            None => on_result(DangerType::NotDangerous),
        }
    }

    /// Apply queued collaborator events. Returns the number handled.
    pub fn pump(&mut self, mgr: &mut DownloadManager) -> usize {
        let mut handled = 0;
        while let Some(event) = self.control.try_next() {
            self.dispatch(mgr, event);
            handled += 1;
        }
        handled
    }

    /// Await and apply one collaborator event. `false` after shutdown.
    pub async fn next_turn(&mut self, mgr: &mut DownloadManager) -> bool {
        match self.control.next().await {
            Some(event) => {
                self.dispatch(mgr, event);
                true
            }
            None => false,
        }
    }

    fn dispatch(&mut self, mgr: &mut DownloadManager, event: ControlEvent) {
        match event {
            ControlEvent::CheckDone { id, verdict } => self.on_check_done(mgr, id, verdict),
            ControlEvent::Resume { id } => self.on_resume(mgr, id),
        }
    }

    fn on_check_done(&mut self, mgr: &mut DownloadManager, id: DownloadId, verdict: Verdict) {
        tracing::debug!(id, verdict = verdict.as_str(), "safety check finished");
        if let Some(download) = mgr.get_mut(id) {
            if download.is_in_progress() {
                let danger = reconcile(
                    verdict,
                    download.danger_level,
                    download.danger_type,
                    self.prefs.reconcile_policy(),
                );
                let (reported, interrupt) = content_check_outcome(danger);
                download.apply_content_check(reported, interrupt);
            }
            self.phases.insert(id, Phase::Ready);
        }

        if let Some(on_ready) = self.cache.complete(id, verdict) {
            // Fresh existence lookup: a download removed mid-check must not
            // have its stale continuation invoked.
            if mgr.get(id).is_some() {
                self.phases.insert(id, Phase::Released);
                on_ready();
            } else {
                tracing::debug!(id, "dropping continuation for removed download");
            }
        }
    }

    fn on_resume(&mut self, mgr: &mut DownloadManager, id: DownloadId) {
        if let Some(on_ready) = self.cache.take_callback(id) {
            if mgr.get(id).is_some() {
                self.phases.insert(id, Phase::Released);
                on_ready();
            } else {
                tracing::debug!(id, "dropping deferred continuation for removed download");
            }
        }
    }

    /// Must be called when the manager destroys a download; drops its verdict
    /// record so a late checker result becomes a no-op.
    pub fn on_download_removed(&mut self, id: DownloadId) {
        self.cache.remove(id);
        self.phases.insert(id, Phase::Removed);
    }

    /// Invalidate every pending continuation and collaborator handle. Late
    /// checker callbacks after this are silent no-ops.
    pub fn shutdown(&mut self) {
        tracing::info!("target coordinator shutting down");
        self.control.revoke();
        self.cache.clear();
        self.phases.clear();
    }

    fn download_directory(&self) -> PathBuf {
        self.prefs
            .default_download_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Confirmation step: an embedder-set save path wins; otherwise the
    /// prompt collaborator (when present) is asked. `None` means cancelled.
    fn confirm_path(
        &mut self,
        url: &str,
        save_path: Option<PathBuf>,
        reserved: ReservedPath,
    ) -> Option<(PathBuf, TargetDisposition)> {
        if let Some(path) = save_path.filter(|p| !p.as_os_str().is_empty()) {
            // Embedder chose already; the speculative reservation is released
            // when `reserved` drops.
            return Some((path, TargetDisposition::Automatic));
        }
        let Some(prompt) = &self.prompt else {
            return Some((reserved.into_path(), TargetDisposition::Automatic));
        };

        let suggested = reserved.path().to_path_buf();
        let chosen = prompt.show_save_dialog(SaveDialogSettings {
            title: url.to_string(),
            default_path: suggested.clone(),
        })?;
        if chosen.as_os_str().is_empty() {
            return None;
        }
        self.prefs
            .set_default_download_dir(chosen.parent().unwrap_or(Path::new("")));
        let path = if chosen == suggested {
            reserved.into_path()
        } else {
            // User picked elsewhere; release the speculative claim.
            chosen
        };
        Some((path, TargetDisposition::PromptConfirmed))
    }
}
