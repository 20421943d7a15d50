//! Host checks performed once at startup, before any action.

use std::fmt;

use crate::error::{InstallError, Result};

/// System package manager found on `PATH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
    Zypper,
}

impl PackageManager {
    const ALL: [PackageManager; 4] = [
        PackageManager::Apt,
        PackageManager::Dnf,
        PackageManager::Pacman,
        PackageManager::Zypper,
    ];

    pub fn binary(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
            PackageManager::Zypper => "zypper",
        }
    }

    /// First supported package manager for which `exists` returns true.
    pub fn detect_with(exists: impl Fn(&str) -> bool) -> Option<Self> {
        Self::ALL.into_iter().find(|pm| exists(pm.binary()))
    }

    pub fn detect() -> Option<Self> {
        Self::detect_with(|bin| which::which(bin).is_ok())
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Vendor API platform string for an architecture.
pub fn platform_for(os: &str, arch: &str) -> Result<&'static str> {
    if os != "linux" {
        return Err(InstallError::UnsupportedEnvironment(format!(
            "operating system {os} is not supported"
        )));
    }
    match arch {
        "x86_64" => Ok("linux-x64"),
        "aarch64" => Ok("linux-arm64"),
        other => Err(InstallError::UnsupportedEnvironment(format!(
            "architecture {other} is not supported"
        ))),
    }
}

/// Result of the startup check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    pub platform: &'static str,
    pub package_manager: PackageManager,
}

/// Require Linux on a supported architecture with a known package manager.
pub fn check() -> Result<HostEnvironment> {
    let platform = platform_for(std::env::consts::OS, std::env::consts::ARCH)?;
    let package_manager = PackageManager::detect().ok_or_else(|| {
        InstallError::UnsupportedEnvironment(
            "no supported package manager (apt-get, dnf, pacman, zypper) found on PATH".to_string(),
        )
    })?;
    tracing::debug!(platform, %package_manager, "host environment");
    Ok(HostEnvironment {
        platform,
        package_manager,
    })
}
