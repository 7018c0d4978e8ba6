//! `downgate reconcile <verdict> <level>` – show how a checker verdict and a
//! static danger level combine.

use anyhow::{bail, Result};
use downgate_core::config::Preferences;
use downgate_core::verdict::{
    content_check_outcome, reconcile, DangerLevel, DangerType, Verdict,
};

pub fn run_reconcile(prefs: &dyn Preferences, verdict: &str, level: &str) -> Result<()> {
    let Some(verdict) = Verdict::parse(verdict) else {
        bail!("unknown verdict: {verdict}");
    };
    let Some(level) = DangerLevel::parse(level) else {
        bail!("unknown danger level: {level}");
    };

    // A suspicious type carries the pending-check placeholder going in.
    let current = if level == DangerLevel::NotDangerous {
        DangerType::NotDangerous
    } else {
        DangerType::MaybeDangerousContent
    };
    let danger = reconcile(verdict, level, current, prefs.reconcile_policy());
    let (reported, interrupt) = content_check_outcome(danger);

    println!("danger:   {}", danger.as_str());
    println!("blocked:  {}", interrupt.is_some());
    println!("reported: {}", reported.as_str());
    Ok(())
}
