//! Preferences: persisted configuration and the collaborator trait.
//!
//! The coordinator reads the default download directory at
//! target-determination time and writes it back after a successful manual
//! save dialog. The TOML file under the XDG config dir is the production
//! implementation; the in-memory one serves tests and one-shot overrides.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::verdict::ReconcilePolicy;

/// Persisted configuration (`~/.config/downgate/config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GateConfig {
    /// Last directory the user chose in a save dialog.
    #[serde(default)]
    pub default_download_dir: Option<PathBuf>,
    /// Escalate an inconclusive scan even without static suspicion.
    #[serde(default)]
    pub escalate_inconclusive_clean: bool,
}

impl GateConfig {
    pub fn reconcile_policy(&self) -> ReconcilePolicy {
        ReconcilePolicy {
            escalate_inconclusive_clean: self.escalate_inconclusive_clean,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("downgate")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init_at(path: &Path) -> Result<GateConfig> {
    if !path.exists() {
        let default_cfg = GateConfig::default();
        save_at(&default_cfg, path)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    let data = fs::read_to_string(path)?;
    Ok(toml::from_str(&data)?)
}

pub fn save_at(cfg: &GateConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

/// Preference store consumed by the coordinator.
pub trait Preferences: Send {
    fn default_download_dir(&self) -> Option<PathBuf>;
    /// Remember the directory of a manually chosen save path.
    fn set_default_download_dir(&mut self, dir: &Path);
    fn reconcile_policy(&self) -> ReconcilePolicy;
}

/// TOML-file-backed preferences; every write persists immediately.
#[derive(Debug)]
pub struct FilePreferences {
    config: GateConfig,
    path: PathBuf,
}

impl FilePreferences {
    /// Open the preferences at the XDG config path, creating defaults.
    pub fn load_or_init() -> Result<Self> {
        Self::from_path(&config_path()?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self {
            config: load_or_init_at(path)?,
            path: path.to_path_buf(),
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

impl Preferences for FilePreferences {
    fn default_download_dir(&self) -> Option<PathBuf> {
        self.config.default_download_dir.clone()
    }

    fn set_default_download_dir(&mut self, dir: &Path) {
        self.config.default_download_dir = Some(dir.to_path_buf());
        if let Err(e) = save_at(&self.config, &self.path) {
            tracing::warn!("failed to persist default download dir: {e:#}");
        }
    }

    fn reconcile_policy(&self) -> ReconcilePolicy {
        self.config.reconcile_policy()
    }
}

/// Volatile preferences for tests and simulation.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    pub default_download_dir: Option<PathBuf>,
    pub escalate_inconclusive_clean: bool,
}

impl MemoryPreferences {
    pub fn with_dir(dir: &Path) -> Self {
        Self {
            default_download_dir: Some(dir.to_path_buf()),
            escalate_inconclusive_clean: false,
        }
    }
}

impl Preferences for MemoryPreferences {
    fn default_download_dir(&self) -> Option<PathBuf> {
        self.default_download_dir.clone()
    }

    fn set_default_download_dir(&mut self, dir: &Path) {
        self.default_download_dir = Some(dir.to_path_buf());
    }

    fn reconcile_policy(&self) -> ReconcilePolicy {
        ReconcilePolicy {
            escalate_inconclusive_clean: self.escalate_inconclusive_clean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = GateConfig::default();
        assert!(cfg.default_download_dir.is_none());
        assert!(!cfg.escalate_inconclusive_clean);
        assert!(!cfg.reconcile_policy().escalate_inconclusive_clean);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = GateConfig {
            default_download_dir: Some(PathBuf::from("/home/user/Downloads")),
            escalate_inconclusive_clean: true,
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: GateConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.default_download_dir, cfg.default_download_dir);
        assert!(parsed.escalate_inconclusive_clean);
    }

    #[test]
    fn config_toml_missing_fields_default() {
        let cfg: GateConfig = toml::from_str("").unwrap();
        assert!(cfg.default_download_dir.is_none());
        assert!(!cfg.escalate_inconclusive_clean);
    }

    #[test]
    fn file_preferences_create_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let prefs = FilePreferences::from_path(&path).unwrap();
        assert!(path.exists(), "default config written");
        assert!(prefs.default_download_dir().is_none());
        assert!(!prefs.reconcile_policy().escalate_inconclusive_clean);
    }

    #[test]
    fn file_preferences_persist_default_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut prefs = FilePreferences::from_path(&path).unwrap();
        prefs.set_default_download_dir(Path::new("/srv/downloads"));

        // A fresh load sees the directory chosen in the previous session.
        let reloaded = FilePreferences::from_path(&path).unwrap();
        assert_eq!(
            reloaded.default_download_dir(),
            Some(PathBuf::from("/srv/downloads"))
        );
    }

    #[test]
    fn memory_preferences_remember_dir() {
        let mut prefs = MemoryPreferences::default();
        assert!(prefs.default_download_dir().is_none());
        prefs.set_default_download_dir(Path::new("/tmp/dl"));
        assert_eq!(
            prefs.default_download_dir(),
            Some(PathBuf::from("/tmp/dl"))
        );
    }
}
