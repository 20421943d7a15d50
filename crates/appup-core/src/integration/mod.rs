//! System integration points that reference the artifact by path: desktop
//! launchers and the CLI shim.
//!
//! Nothing about a previous configuration is persisted. Whether an
//! integration is current is decided by reading the files back and comparing
//! the embedded path with the artifact that is on disk now.

pub mod desktop;
pub mod shim;

use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::AppupConfig;
use crate::error::{InstallError, Result};

/// Static launcher metadata plus the flag passed to the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integration {
    pub app_name: String,
    pub display_name: String,
    pub comment: String,
    pub categories: String,
    pub keywords: String,
    pub launch_flag: String,
    pub trust_desktop_launcher: bool,
}

impl Integration {
    pub fn from_config(cfg: &AppupConfig) -> Self {
        Self {
            app_name: cfg.app_name.clone(),
            display_name: cfg.display_name.clone(),
            comment: cfg.comment.clone(),
            categories: cfg.categories.clone(),
            keywords: cfg.keywords.clone(),
            launch_flag: cfg.launch_flag.clone(),
            trust_desktop_launcher: cfg.trust_desktop_launcher,
        }
    }
}

/// Health of one integration point relative to the current artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationState {
    Valid,
    /// Missing entirely.
    NeedsConfiguration,
    /// Present but pointing at another path (e.g. a superseded version).
    NeedsReconfiguration,
}

impl IntegrationState {
    pub fn is_valid(self) -> bool {
        self == IntegrationState::Valid
    }
}

impl fmt::Display for IntegrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IntegrationState::Valid => "VALID",
            IntegrationState::NeedsConfiguration => "NEEDS CONFIGURATION",
            IntegrationState::NeedsReconfiguration => "NEEDS RECONFIGURATION",
        })
    }
}

/// Compare the path embedded in an integration file with `artifact`.
fn check_embedded(
    file: &Path,
    artifact: &Path,
    extract: impl Fn(&str) -> Option<String>,
) -> IntegrationState {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return IntegrationState::NeedsConfiguration
        }
        Err(e) => {
            tracing::debug!(path = %file.display(), "unreadable integration file: {}", e);
            return IntegrationState::NeedsReconfiguration;
        }
    };
    match extract(&content) {
        Some(p) if Path::new(&p) == artifact => IntegrationState::Valid,
        _ => IntegrationState::NeedsReconfiguration,
    }
}

/// Write `content` to `path` (creating parent dirs) with the given mode.
fn write_file(path: &Path, content: &str, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| InstallError::io(path, e))?;
    set_mode(path, mode)?;
    tracing::info!(path = %path.display(), "wrote integration file");
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| InstallError::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Remove `path` if present. Returns whether anything was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(InstallError::io(path, e)),
    }
}
