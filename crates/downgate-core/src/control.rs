//! Control-thread marshalling for asynchronous collaborators.
//!
//! All download-state mutation is serialized on one control thread. The
//! safety checker does its work elsewhere and posts a [`ControlEvent`]
//! through a [`ControlHandle`]; the coordinator drains the channel on the
//! control thread. The handle carries a revocation flag: after shutdown,
//! posting and draining become silent no-ops, so a late checker callback can
//! never touch freed state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::download::DownloadId;
use crate::verdict::Verdict;

/// Event delivered back onto the control thread.
#[derive(Debug)]
pub enum ControlEvent {
    /// The safety checker finished scanning a download.
    CheckDone { id: DownloadId, verdict: Verdict },
    /// Deferred completion-readiness re-check for a verdict that was decided
    /// without a checker round-trip.
    Resume { id: DownloadId },
}

/// Cloneable sender half handed to asynchronous collaborators.
#[derive(Clone)]
pub struct ControlHandle {
    tx: mpsc::UnboundedSender<ControlEvent>,
    revoked: Arc<AtomicBool>,
}

impl ControlHandle {
    /// Post an event onto the control thread. After revocation this drops
    /// the event silently.
    pub fn post(&self, event: ControlEvent) {
        if self.revoked.load(Ordering::Acquire) {
            tracing::debug!(?event, "control handle revoked, dropping event");
            return;
        }
        // A closed receiver means the coordinator is already gone.
        let _ = self.tx.send(event);
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::Acquire)
    }
}

/// Owning side of the control channel, held by the coordinator.
pub struct ControlChannel {
    tx: mpsc::UnboundedSender<ControlEvent>,
    rx: mpsc::UnboundedReceiver<ControlEvent>,
    revoked: Arc<AtomicBool>,
}

impl Default for ControlChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            revoked: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A new handle for a collaborator. Handles stay valid until [`revoke`].
    ///
    /// [`revoke`]: ControlChannel::revoke
    pub fn handle(&self) -> ControlHandle {
        ControlHandle {
            tx: self.tx.clone(),
            revoked: Arc::clone(&self.revoked),
        }
    }

    /// Next queued event, or `None` when the queue is empty or the channel
    /// has been revoked. Events queued before revocation are discarded.
    pub fn try_next(&mut self) -> Option<ControlEvent> {
        loop {
            let event = self.rx.try_recv().ok()?;
            if self.revoked.load(Ordering::Acquire) {
                tracing::debug!(?event, "discarding event queued before shutdown");
                continue;
            }
            return Some(event);
        }
    }

    /// Await the next event. `None` after revocation.
    pub async fn next(&mut self) -> Option<ControlEvent> {
        let event = self.rx.recv().await?;
        if self.revoked.load(Ordering::Acquire) {
            return None;
        }
        Some(event)
    }

    /// Invalidate every outstanding handle.
    pub fn revoke(&self) {
        self.revoked.store(true, Ordering::Release);
    }
}
