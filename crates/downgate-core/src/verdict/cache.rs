//! Per-download verdict records and continuation slots.
//!
//! One record exists per download that has started a safety check, keyed by
//! download id. Each record holds at most one pending continuation; a newer
//! readiness check on the same download replaces the stored continuation
//! (newest caller wins) and never starts a second check. `complete` tolerates
//! ids whose record is already gone: the download vanished mid-check and the
//! verdict is dropped as a silent no-op.

use std::collections::HashMap;

use crate::download::DownloadId;

use super::Verdict;

/// Stored continuation: "resume the completion decision now".
pub type CompletionCallback = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckState {
    /// A check has been started and no result has arrived.
    Pending,
    /// The verdict is known and cached.
    Resolved(Verdict),
    /// Checks are administratively disabled for this download.
    Disabled,
}

struct VerdictRecord {
    state: CheckState,
    callback: Option<CompletionCallback>,
}

impl std::fmt::Debug for VerdictRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerdictRecord")
            .field("state", &self.state)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Outcome of [`VerdictCache::begin_or_join`]. Variants that resolve
/// synchronously hand the caller's continuation back untouched.
pub enum BeginOrJoin {
    /// No record existed; one was created and the continuation stored.
    /// The caller must start exactly one safety check.
    Start,
    /// A check is already in flight; the continuation replaced the previous
    /// one. The caller must not start another check.
    Joined,
    /// The verdict is already cached; no continuation slot was consumed.
    Resolved(Verdict, CompletionCallback),
    /// Checks are disabled for this download; no slot was consumed.
    Disabled(CompletionCallback),
}

/// Id-keyed table of verdict records owned by the coordinator.
#[derive(Debug, Default)]
pub struct VerdictCache {
    records: HashMap<DownloadId, VerdictRecord>,
}

impl VerdictCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a check or join the in-flight one for `id`.
    pub fn begin_or_join(&mut self, id: DownloadId, callback: CompletionCallback) -> BeginOrJoin {
        match self.records.get_mut(&id) {
            None => {
                self.records.insert(
                    id,
                    VerdictRecord {
                        state: CheckState::Pending,
                        callback: Some(callback),
                    },
                );
                BeginOrJoin::Start
            }
            Some(record) => match record.state {
                CheckState::Pending => {
                    // Newest caller wins; the superseded continuation is dropped.
                    record.callback = Some(callback);
                    BeginOrJoin::Joined
                }
                CheckState::Resolved(verdict) => BeginOrJoin::Resolved(verdict, callback),
                CheckState::Disabled => BeginOrJoin::Disabled(callback),
            },
        }
    }

    /// Record the verdict for `id` and take the pending continuation, if any,
    /// for exactly-once invocation by the caller.
    ///
    /// A missing record (download removed mid-check) is a no-op. A verdict is
    /// final per download: a second `complete` never overwrites the first.
    pub fn complete(&mut self, id: DownloadId, verdict: Verdict) -> Option<CompletionCallback> {
        let record = self.records.get_mut(&id)?;
        match record.state {
            CheckState::Pending => {
                record.state = CheckState::Resolved(verdict);
                record.callback.take()
            }
            CheckState::Resolved(_) | CheckState::Disabled => None,
        }
    }

    /// Insert an already-resolved record with a deferred continuation.
    ///
    /// Used when the verdict was decided locally (checker unavailable) and
    /// the continuation must fire on a later control-thread turn rather than
    /// re-entering the caller.
    pub fn insert_resolved(
        &mut self,
        id: DownloadId,
        verdict: Verdict,
        callback: CompletionCallback,
    ) {
        self.records.insert(
            id,
            VerdictRecord {
                state: CheckState::Resolved(verdict),
                callback: Some(callback),
            },
        );
    }

    /// Take the stored continuation without touching the state.
    pub fn take_callback(&mut self, id: DownloadId) -> Option<CompletionCallback> {
        self.records.get_mut(&id)?.callback.take()
    }

    /// Permanently disable checks for `id`. Any pending continuation is
    /// dropped; subsequent readiness checks resolve synchronously.
    pub fn disable(&mut self, id: DownloadId) {
        self.records.insert(
            id,
            VerdictRecord {
                state: CheckState::Disabled,
                callback: None,
            },
        );
    }

    pub fn is_disabled(&self, id: DownloadId) -> bool {
        matches!(
            self.records.get(&id).map(|r| r.state),
            Some(CheckState::Disabled)
        )
    }

    /// Cached verdict for `id`, if the check already resolved.
    pub fn cached_verdict(&self, id: DownloadId) -> Option<Verdict> {
        match self.records.get(&id)?.state {
            CheckState::Resolved(v) => Some(v),
            _ => None,
        }
    }

    /// True when a check has started for `id` (pending, resolved, or disabled).
    pub fn contains(&self, id: DownloadId) -> bool {
        self.records.contains_key(&id)
    }

    /// Drop the record for a destroyed download.
    pub fn remove(&mut self, id: DownloadId) {
        self.records.remove(&id);
    }

    /// Drop every record (coordinator shutdown).
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
