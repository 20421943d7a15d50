//! One pass over the requested actions.
//!
//! Hard failures come back as `Err(InstallError)` and end the run. Best-effort
//! steps record a [`Warning`] in the [`RunReport`] and the run continues.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::artifact::{LocalArtifact, RemoteArtifact, VersionTag, UNKNOWN_FINGERPRINT};
use crate::downloader::ProgressFn;
use crate::error::{InstallError, Result, Step, Warning};
use crate::fingerprint::compute_fingerprint;
use crate::integration::{self, desktop, shim, Integration};
use crate::layout::Layout;
use crate::reconcile::{reconcile, Reconciliation};
use crate::remote::Remote;
use crate::status::{self, StatusReport};
use crate::storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Fetch,
    ConfigureDesktop,
    ConfigureCli,
    Status,
    Remove,
    Purge,
}

/// Requested actions for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet(BTreeSet<Action>);

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: Action) -> Self {
        self.0.insert(action);
        self
    }

    pub fn insert(&mut self, action: Action) {
        self.0.insert(action);
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn wants_configuration(&self) -> bool {
        self.contains(Action::ConfigureDesktop) || self.contains(Action::ConfigureCli)
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        ActionSet(iter.into_iter().collect())
    }
}

/// What the fetch step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Local fingerprint already equals the remote one; nothing transferred.
    UpToDate { remote: RemoteArtifact },
    Downloaded {
        remote: RemoteArtifact,
        previous: Reconciliation,
        bytes: u64,
    },
}

/// Paths removed by `Remove`/`Purge`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    pub removed: Vec<PathBuf>,
}

/// Result of a run that did not hit a hard failure.
#[derive(Debug, Default)]
pub struct RunReport {
    pub status: Option<StatusReport>,
    pub removal: Option<Removal>,
    pub fetch: Option<FetchOutcome>,
    /// Artifact the integrations were pointed at, if configuration ran.
    pub artifact: Option<LocalArtifact>,
    /// Launcher files written successfully.
    pub launchers_written: Vec<PathBuf>,
    pub shim_written: bool,
    pub warnings: Vec<Warning>,
}

impl RunReport {
    /// A launcher or the shim could not be written.
    pub fn integration_failed(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w.step, Step::Launcher | Step::Shim))
    }
}

/// Drives one invocation against a [`Remote`] and a [`Layout`].
pub struct Installer<'a, R: Remote> {
    pub remote: &'a R,
    pub layout: &'a Layout,
    pub integration: &'a Integration,
}

impl<'a, R: Remote> Installer<'a, R> {
    pub fn new(remote: &'a R, layout: &'a Layout, integration: &'a Integration) -> Self {
        Self {
            remote,
            layout,
            integration,
        }
    }

    pub fn run(&self, actions: &ActionSet, progress: &mut ProgressFn<'_>) -> Result<RunReport> {
        let mut report = RunReport::default();

        if actions.contains(Action::Status) {
            report.status = Some(status::report(self.layout, &self.integration.launch_flag));
            return Ok(report);
        }

        if actions.contains(Action::Remove) || actions.contains(Action::Purge) {
            let purge = actions.contains(Action::Purge);
            report.removal = Some(self.remove(purge, &mut report.warnings)?);
            return Ok(report);
        }

        let mut local: Option<LocalArtifact> = None;
        if actions.contains(Action::Fetch) {
            let (artifact, outcome) = self.fetch(progress, &mut report.warnings)?;
            local = Some(artifact);
            report.fetch = Some(outcome);
        }

        if !actions.wants_configuration() {
            return Ok(report);
        }

        let artifact = match local {
            Some(a) => a,
            None => storage::locate_local(&self.layout.storage_dir, &self.layout.pattern)?
                .ok_or_else(|| InstallError::MissingArtifact {
                    storage_dir: self.layout.storage_dir.clone(),
                })?,
        };

        if let Err(e) = self.remote.fetch_icon(&self.layout.icon_path) {
            report.warnings.push(Warning::new(Step::Icon, e));
        }
        if actions.contains(Action::ConfigureDesktop) {
            self.configure_desktop(&artifact, &mut report);
        }
        if actions.contains(Action::ConfigureCli) {
            self.configure_cli(&artifact, &mut report);
        }
        report.artifact = Some(artifact);
        Ok(report)
    }

    /// Resolve the remote build and download it unless the local copy matches.
    fn fetch(
        &self,
        progress: &mut ProgressFn<'_>,
        warnings: &mut Vec<Warning>,
    ) -> Result<(LocalArtifact, FetchOutcome)> {
        let remote = self.remote.resolve()?;
        tracing::info!(
            name = %remote.name,
            version = %remote.version,
            fingerprint = %remote.fingerprint,
            "remote artifact"
        );
        // The locator only ever sees pattern-matching names; adopting anything
        // else would leave an artifact that no later run can find.
        if !self.layout.pattern.matches(&remote.name) {
            return Err(InstallError::Protocol(format!(
                "vendor artifact {} does not match {}*{}",
                remote.name, self.layout.pattern.prefix, self.layout.pattern.suffix
            )));
        }
        let local = storage::locate_local(&self.layout.storage_dir, &self.layout.pattern)?;

        let state = reconcile(local.as_ref(), &remote);
        if let (false, Some(local)) = (state.needs_download(), local) {
            tracing::info!(path = %local.path.display(), "local artifact is up to date");
            return Ok((local, FetchOutcome::UpToDate { remote }));
        }

        let dest = self.layout.storage_dir.join(&remote.name);
        let bytes = self.remote.download(&remote, &dest, progress)?;
        let fingerprint = compute_fingerprint(&dest)?;
        if remote.fingerprint != UNKNOWN_FINGERPRINT && fingerprint != remote.fingerprint {
            warnings.push(Warning::new(
                Step::Verify,
                format!(
                    "downloaded fingerprint {fingerprint} differs from remote {}",
                    remote.fingerprint
                ),
            ));
        }
        let local = LocalArtifact {
            path: dest,
            name: remote.name.clone(),
            size_bytes: bytes,
            version: VersionTag::from_name(&remote.name),
            fingerprint,
        };
        Ok((
            local,
            FetchOutcome::Downloaded {
                remote,
                previous: state,
                bytes,
            },
        ))
    }

    /// Write both launchers. Each is attempted even if the other fails.
    fn configure_desktop(&self, artifact: &LocalArtifact, report: &mut RunReport) {
        let content =
            desktop::render_entry(self.integration, &artifact.path, &self.layout.icon_path);
        for (i, entry) in self.layout.desktop_entries.iter().enumerate() {
            if let Err(e) = desktop::write_entry(entry, &content) {
                report.warnings.push(Warning::new(Step::Launcher, e));
                continue;
            }
            report.launchers_written.push(entry.clone());
            // Only the user-desktop launcher needs trusting.
            if i == 0 && self.integration.trust_desktop_launcher {
                if let Err(e) = desktop::mark_trusted(entry) {
                    report.warnings.push(Warning::new(Step::TrustMark, e));
                }
            }
        }
    }

    fn configure_cli(&self, artifact: &LocalArtifact, report: &mut RunReport) {
        let content = shim::render_shim(self.integration, &artifact.path);
        match shim::write_shim(&self.layout.shim_path, &content) {
            Ok(()) => report.shim_written = true,
            Err(e) => report.warnings.push(Warning::new(Step::Shim, e)),
        }
    }

    /// Remove icon, launchers and shim; with `purge` also every artifact and
    /// leftover partial download. Absent files are not an error.
    fn remove(&self, purge: bool, warnings: &mut Vec<Warning>) -> Result<Removal> {
        let mut targets: Vec<PathBuf> = vec![self.layout.icon_path.clone()];
        targets.extend(self.layout.desktop_entries.iter().cloned());
        targets.push(self.layout.shim_path.clone());
        if purge {
            targets.extend(storage::list_artifacts(
                &self.layout.storage_dir,
                &self.layout.pattern,
            )?);
            targets.extend(storage::list_partials(
                &self.layout.storage_dir,
                &self.layout.pattern,
            )?);
        }

        let mut removal = Removal::default();
        for path in targets {
            match integration::remove_if_exists(&path) {
                Ok(true) => removal.removed.push(path),
                Ok(false) => {}
                Err(e) => warnings.push(Warning::new(Step::Removal, e)),
            }
        }
        Ok(removal)
    }
}
