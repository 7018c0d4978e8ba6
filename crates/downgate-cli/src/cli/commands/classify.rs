//! `downgate classify <path>` – static danger classification of a filename.

use anyhow::Result;
use downgate_core::verdict::{danger_level_for_path, neutralize_resource_name};
use std::path::Path;

pub fn run_classify(path: &Path) -> Result<()> {
    let level = danger_level_for_path(path);
    println!("level: {}", level.as_str());
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        println!("saved-resource name: {}", neutralize_resource_name(name));
    }
    Ok(())
}
