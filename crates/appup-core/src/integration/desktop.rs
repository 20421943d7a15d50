//! Desktop entry (`.desktop`) launchers.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{check_embedded, write_file, Integration, IntegrationState};
use crate::error::{InstallError, Result};

/// Render the launcher. Only the `Exec=` and `Icon=` lines depend on the run.
pub fn render_entry(integration: &Integration, artifact: &Path, icon: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Name={name}\n\
         Comment={comment}\n\
         Exec={exec} {flag}\n\
         Icon={icon}\n\
         Type=Application\n\
         Terminal=false\n\
         StartupNotify=true\n\
         StartupWMClass={name}\n\
         Categories={categories}\n\
         Keywords={keywords}\n",
        name = integration.display_name,
        comment = integration.comment,
        exec = artifact.display(),
        flag = integration.launch_flag,
        icon = icon.display(),
        categories = integration.categories,
        keywords = integration.keywords,
    )
}

/// Path component of the first `Exec=` line.
pub fn parse_exec_path(content: &str, launch_flag: &str) -> Option<String> {
    let value = content
        .lines()
        .find_map(|l| l.trim_start().strip_prefix("Exec="))?
        .trim();
    let path = match value.strip_suffix(launch_flag) {
        Some(rest) if !launch_flag.is_empty() => rest.trim_end(),
        _ => value.split_whitespace().next()?,
    };
    (!path.is_empty()).then(|| path.to_string())
}

pub fn write_entry(path: &Path, content: &str) -> Result<()> {
    write_file(path, content, 0o755)
}

/// Both launchers must point at `artifact`. A missing launcher wins over a
/// mismatched one.
pub fn check(entries: &[PathBuf], artifact: &Path, launch_flag: &str) -> IntegrationState {
    let states: Vec<IntegrationState> = entries
        .iter()
        .map(|e| check_embedded(e, artifact, |c| parse_exec_path(c, launch_flag)))
        .collect();
    if states.contains(&IntegrationState::NeedsConfiguration) {
        IntegrationState::NeedsConfiguration
    } else if states.contains(&IntegrationState::NeedsReconfiguration) {
        IntegrationState::NeedsReconfiguration
    } else {
        IntegrationState::Valid
    }
}

/// Mark a desktop-folder launcher as trusted so it can be started by
/// double-click (GNOME).
pub fn mark_trusted(path: &Path) -> Result<()> {
    let status = Command::new("gio")
        .arg("set")
        .arg(path)
        .arg("metadata::trusted")
        .arg("true")
        .status()
        .map_err(|e| InstallError::io(path, e))?;
    if !status.success() {
        return Err(InstallError::io(
            path,
            std::io::Error::other(format!("gio set exited with {status}")),
        ));
    }
    Ok(())
}
