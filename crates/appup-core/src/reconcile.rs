//! Decide whether the local artifact is current.
//!
//! Only the content fingerprint is compared. Names and versions are not
//! trusted: version extraction can silently fall back to `0.0.0`.

use crate::artifact::{LocalArtifact, RemoteArtifact};

/// Outcome of comparing local storage with the remote build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing deposited yet.
    NotInstalled,
    /// Local fingerprint differs from the remote one (or the remote sent no ETag).
    Stale,
    UpToDate,
}

impl Reconciliation {
    pub fn needs_download(self) -> bool {
        !matches!(self, Reconciliation::UpToDate)
    }
}

pub fn reconcile(local: Option<&LocalArtifact>, remote: &RemoteArtifact) -> Reconciliation {
    let outcome = match local {
        None => Reconciliation::NotInstalled,
        Some(l) if l.same_content(remote) => Reconciliation::UpToDate,
        Some(_) => Reconciliation::Stale,
    };
    tracing::debug!(
        local = local.map(|l| l.fingerprint.as_str()).unwrap_or("-"),
        remote = %remote.fingerprint,
        ?outcome,
        "reconciled"
    );
    outcome
}

/// True if the artifact must be (re)downloaded.
pub fn needs_download(local: Option<&LocalArtifact>, remote: &RemoteArtifact) -> bool {
    reconcile(local, remote).needs_download()
}
