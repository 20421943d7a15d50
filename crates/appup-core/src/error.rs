//! Error taxonomy for the installer and the soft-failure record used for
//! best-effort steps.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Hard failure. Returned through `Result` and aborts the current run.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Host unreachable, timeout, non-2xx on the artifact URL, short transfer.
    #[error("network error: {0}")]
    Network(String),

    /// The vendor API answered, but not with what we expected.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration action was requested with nothing on disk to point at.
    #[error("no local artifact found in {}; run with --fetch first", .storage_dir.display())]
    MissingArtifact { storage_dir: PathBuf },

    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(String),
}

impl InstallError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        InstallError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn network(e: impl fmt::Display) -> Self {
        InstallError::Network(e.to_string())
    }
}

impl From<curl::Error> for InstallError {
    fn from(e: curl::Error) -> Self {
        InstallError::Network(e.to_string())
    }
}

pub type Result<T, E = InstallError> = std::result::Result<T, E>;

/// Best-effort step that failed without aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Icon,
    TrustMark,
    Launcher,
    Shim,
    Removal,
    Verify,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Icon => "icon",
            Step::TrustMark => "trust-mark",
            Step::Launcher => "launcher",
            Step::Shim => "cli shim",
            Step::Removal => "removal",
            Step::Verify => "verify",
        };
        f.write_str(s)
    }
}

/// Soft failure: logged, collected, and reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub step: Step,
    pub message: String,
}

impl Warning {
    pub fn new(step: Step, message: impl fmt::Display) -> Self {
        let message = message.to_string();
        tracing::warn!(%step, "{}", message);
        Warning { step, message }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_path() {
        let e = InstallError::io(
            Path::new("/tmp/x.AppImage"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let s = e.to_string();
        assert!(s.contains("/tmp/x.AppImage"));
        assert!(s.contains("denied"));
    }

    #[test]
    fn missing_artifact_directs_to_fetch() {
        let e = InstallError::MissingArtifact {
            storage_dir: PathBuf::from("/home/u/Applications"),
        };
        assert!(e.to_string().contains("--fetch"));
    }

    #[test]
    fn warning_display_names_step() {
        let w = Warning::new(Step::Icon, "HTTP 404");
        assert_eq!(w.to_string(), "icon: HTTP 404");
    }
}
