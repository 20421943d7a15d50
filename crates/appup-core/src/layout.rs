//! Filesystem locations the installer reads and writes.

use std::path::{Path, PathBuf};

use crate::config::AppupConfig;
use crate::error::{InstallError, Result};
use crate::storage::ArtifactPattern;

/// Resolved paths. Built once per run and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub storage_dir: PathBuf,
    pub pattern: ArtifactPattern,
    /// User desktop entry first, application menu entry second.
    pub desktop_entries: [PathBuf; 2],
    pub icon_path: PathBuf,
    pub shim_path: PathBuf,
}

impl Layout {
    /// Resolve from config, the home directory and XDG base directories.
    pub fn from_config(cfg: &AppupConfig) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            InstallError::UnsupportedEnvironment("cannot determine home directory".to_string())
        })?;
        let xdg_dirs = xdg::BaseDirectories::new().map_err(|e| {
            InstallError::UnsupportedEnvironment(format!("XDG base directories: {e}"))
        })?;
        let desktop_dir = dirs::desktop_dir().unwrap_or_else(|| home.join("Desktop"));
        Ok(Self::with_roots(
            cfg,
            &home,
            &desktop_dir,
            &xdg_dirs.get_data_home(),
        ))
    }

    /// Resolve against explicit roots. Config overrides still apply.
    pub fn with_roots(cfg: &AppupConfig, home: &Path, desktop_dir: &Path, data_home: &Path) -> Self {
        let entry_name = format!("{}.desktop", cfg.app_name);
        Layout {
            storage_dir: cfg
                .storage_dir
                .clone()
                .unwrap_or_else(|| home.join("Applications")),
            pattern: ArtifactPattern::new(&cfg.artifact_prefix, &cfg.artifact_suffix),
            desktop_entries: [
                desktop_dir.join(&entry_name),
                data_home.join("applications").join(&entry_name),
            ],
            icon_path: data_home
                .join("icons")
                .join(format!("{}.png", cfg.app_name)),
            shim_path: cfg
                .shim_path
                .clone()
                .unwrap_or_else(|| PathBuf::from("/usr/local/bin").join(&cfg.app_name)),
        }
    }

    /// Everything rooted under `root`, for tests and sandboxed runs.
    pub fn under(root: &Path, cfg: &AppupConfig) -> Self {
        let mut layout = Self::with_roots(
            cfg,
            &root.join("home"),
            &root.join("home/Desktop"),
            &root.join("home/.local/share"),
        );
        if cfg.shim_path.is_none() {
            layout.shim_path = root.join("usr/local/bin").join(&cfg.app_name);
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_roots() {
        let cfg = AppupConfig::default();
        let l = Layout::with_roots(
            &cfg,
            Path::new("/home/u"),
            Path::new("/home/u/Desktop"),
            Path::new("/home/u/.local/share"),
        );
        assert_eq!(l.storage_dir, PathBuf::from("/home/u/Applications"));
        assert_eq!(
            l.desktop_entries,
            [
                PathBuf::from("/home/u/Desktop/cursor.desktop"),
                PathBuf::from("/home/u/.local/share/applications/cursor.desktop"),
            ]
        );
        assert_eq!(l.icon_path, PathBuf::from("/home/u/.local/share/icons/cursor.png"));
        assert_eq!(l.shim_path, PathBuf::from("/usr/local/bin/cursor"));
        assert!(l.pattern.matches("Cursor-1.0.0-x86_64.AppImage"));
    }

    #[test]
    fn config_overrides_storage_and_shim() {
        let cfg = AppupConfig {
            storage_dir: Some(PathBuf::from("/opt/apps")),
            shim_path: Some(PathBuf::from("/home/u/.local/bin/cursor")),
            ..AppupConfig::default()
        };
        let l = Layout::with_roots(
            &cfg,
            Path::new("/home/u"),
            Path::new("/home/u/Desktop"),
            Path::new("/home/u/.local/share"),
        );
        assert_eq!(l.storage_dir, PathBuf::from("/opt/apps"));
        assert_eq!(l.shim_path, PathBuf::from("/home/u/.local/bin/cursor"));
    }

    #[test]
    fn under_root_keeps_everything_inside() {
        let root = Path::new("/tmp/sandbox");
        let l = Layout::under(root, &AppupConfig::default());
        assert!(l.storage_dir.starts_with(root));
        assert!(l.desktop_entries.iter().all(|p| p.starts_with(root)));
        assert!(l.icon_path.starts_with(root));
        assert!(l.shim_path.starts_with(root));
    }
}
