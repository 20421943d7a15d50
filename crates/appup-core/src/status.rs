//! Installation health, derived entirely from what is on disk now.

use std::fmt;

use crate::artifact::LocalArtifact;
use crate::integration::{desktop, shim, IntegrationState};
use crate::layout::Layout;
use crate::storage::locate_local;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledReport {
    pub artifact: LocalArtifact,
    pub launchers: IntegrationState,
    pub shim: IntegrationState,
}

impl InstalledReport {
    pub fn needs_configuration(&self) -> bool {
        !self.launchers.is_valid() || !self.shim.is_valid()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    NotInstalled,
    Installed(InstalledReport),
    /// Storage could not be read; shown as not installed with the cause.
    Unreadable(String),
}

/// Build the report. Never fails: anything absent or unreadable is reported.
pub fn report(layout: &Layout, launch_flag: &str) -> StatusReport {
    let artifact = match locate_local(&layout.storage_dir, &layout.pattern) {
        Ok(Some(a)) => a,
        Ok(None) => return StatusReport::NotInstalled,
        Err(e) => {
            tracing::warn!("status: {}", e);
            return StatusReport::Unreadable(e.to_string());
        }
    };
    StatusReport::Installed(InstalledReport {
        launchers: desktop::check(&layout.desktop_entries, &artifact.path, launch_flag),
        shim: shim::check(&layout.shim_path, &artifact.path),
        artifact,
    })
}

impl StatusReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self, StatusReport::Installed(r) if !r.needs_configuration())
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = match self {
            StatusReport::NotInstalled => {
                writeln!(f, "Status: NOT INSTALLED")?;
                return writeln!(f, "Run `appup --install` to download and configure it.");
            }
            StatusReport::Unreadable(cause) => {
                writeln!(f, "Status: NOT INSTALLED ({cause})")?;
                return writeln!(f, "Run `appup --install` to download and configure it.");
            }
            StatusReport::Installed(r) => r,
        };
        writeln!(f, "Status: INSTALLED")?;
        writeln!(f, "  Version:     {}", r.artifact.version)?;
        writeln!(f, "  Path:        {}", r.artifact.path.display())?;
        writeln!(
            f,
            "  Size:        {:.1} MiB",
            r.artifact.size_bytes as f64 / 1_048_576.0
        )?;
        writeln!(f, "  Fingerprint: {}", r.artifact.fingerprint)?;
        writeln!(f, "  Launchers:   {}", r.launchers)?;
        writeln!(f, "  CLI shim:    {}", r.shim)?;
        if r.needs_configuration() {
            writeln!(f, "Run `appup --desktop --cli` to update the integration.")?;
        }
        Ok(())
    }
}
