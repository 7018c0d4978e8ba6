//! `downgate simulate <url>` – drive one download through the full gate with
//! a scripted checker verdict.

use anyhow::{bail, Result};
use downgate_core::checker::{CheckRequest, SafetyChecker, UrlCheckCallback};
use downgate_core::config::{FilePreferences, MemoryPreferences, Preferences};
use downgate_core::control::{ControlEvent, ControlHandle};
use downgate_core::download::{DownloadManager, DownloadRequest};
use downgate_core::target::{Phase, TargetCoordinator};
use downgate_core::verdict::Verdict;
use std::path::PathBuf;
use std::sync::Arc;

/// Checker that answers every scan with one fixed verdict.
struct ScriptedChecker(Verdict);

impl SafetyChecker for ScriptedChecker {
    fn check_download(&self, request: CheckRequest, reply: ControlHandle) {
        tracing::info!(id = request.id, "scripted checker scanning");
        reply.post(ControlEvent::CheckDone {
            id: request.id,
            verdict: self.0,
        });
    }

    fn check_url(&self, _url: &str, on_result: UrlCheckCallback) {
        on_result(self.0);
    }
}

pub async fn run_simulate(
    prefs: FilePreferences,
    url: &str,
    verdict: &str,
    download_dir: Option<PathBuf>,
    no_checker: bool,
) -> Result<()> {
    let Some(verdict) = Verdict::parse(verdict) else {
        bail!("unknown verdict: {verdict}");
    };

    // --download-dir is a one-shot override; the persisted preferences stay
    // untouched. Without it the coordinator reads the configured directory.
    let prefs: Box<dyn Preferences> = match download_dir {
        Some(dir) => Box::new(MemoryPreferences {
            default_download_dir: Some(dir),
            escalate_inconclusive_clean: prefs.reconcile_policy().escalate_inconclusive_clean,
        }),
        None => Box::new(prefs),
    };
    let checker: Option<Arc<dyn SafetyChecker>> = if no_checker {
        None
    } else {
        Some(Arc::new(ScriptedChecker(verdict)))
    };
    let mut coord = TargetCoordinator::new(prefs, checker, None);
    let mut mgr = DownloadManager::new();

    let id = mgr.start(DownloadRequest {
        url: url.to_string(),
        ..Default::default()
    });
    coord.determine_target(
        &mut mgr,
        id,
        Box::new(|decision| {
            match &decision.path {
                Some(path) => println!("target:   {} ({:?})", path.display(), decision.outcome),
                None => println!("target:   none ({:?})", decision.outcome),
            }
            println!("danger:   {}", decision.danger.as_str());
        }),
    );

    let ready = coord.should_complete(
        &mut mgr,
        id,
        Box::new(|| println!("released: deferred completion fired")),
    );
    println!("ready immediately: {ready}");
    while coord.phase(id) < Some(Phase::Released) && coord.next_turn(&mut mgr).await {}

    if let Some(download) = mgr.get(id) {
        println!("state:    {}", download.state.as_str());
        println!("verdict danger: {}", download.danger_type.as_str());
        if let Some(reason) = download.interrupt_reason {
            println!("interrupted: {reason:?}");
        }
    }
    coord.shutdown();
    Ok(())
}
