//! CLI for appup.

mod commands;

use anyhow::Result;
use appup_core::config::{self, AppupConfig};
use appup_core::environment::{self, HostEnvironment};
use appup_core::orchestrator::{Action, ActionSet};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_actions, run_fingerprint};

/// Top-level CLI: action flags, or a diagnostic subcommand.
#[derive(Debug, Parser)]
#[command(name = "appup")]
#[command(about = "appup: keep a single downloadable application installed and current", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    #[command(flatten)]
    pub actions: ActionFlags,
}

/// Action flags. Several may be combined; `--status` wins over all others.
#[derive(Debug, Default, Args)]
pub struct ActionFlags {
    /// Download the newest build unless the local copy already matches.
    #[arg(long)]
    pub fetch: bool,

    /// Write the desktop and application-menu launchers.
    #[arg(long)]
    pub desktop: bool,

    /// Write the CLI shim.
    #[arg(long)]
    pub cli: bool,

    /// Shorthand for --fetch --desktop --cli.
    #[arg(long)]
    pub install: bool,

    /// Report installation health (default when no flag is given).
    #[arg(long)]
    pub status: bool,

    /// Remove launchers, icon and CLI shim; keep downloaded artifacts.
    #[arg(long)]
    pub remove: bool,

    /// Like --remove, and also delete every downloaded artifact.
    #[arg(long)]
    pub purge: bool,
}

impl ActionFlags {
    pub fn to_action_set(&self) -> ActionSet {
        if self.status {
            return ActionSet::new().with(Action::Status);
        }
        if self.purge {
            return ActionSet::new().with(Action::Purge);
        }
        if self.remove {
            return ActionSet::new().with(Action::Remove);
        }
        let mut set = ActionSet::new();
        if self.fetch || self.install {
            set.insert(Action::Fetch);
        }
        if self.desktop || self.install {
            set.insert(Action::ConfigureDesktop);
        }
        if self.cli || self.install {
            set.insert(Action::ConfigureCli);
        }
        if set.is_empty() {
            set.insert(Action::Status);
        }
        set
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the content fingerprint of a file (chunked MD5, CDN ETag format).
    Fingerprint {
        /// Path to the file.
        path: PathBuf,
    },
}

impl CliCommand {
    /// Returns `Ok(false)` when the run finished but an integration could not be written.
    pub fn run_from_args() -> Result<bool> {
        let cli = Cli::parse();

        if let Some(CliCommand::Fingerprint { path }) = &cli.command {
            run_fingerprint(path)?;
            return Ok(true);
        }

        let (host, cfg) = prepare(environment::check, config::load_or_init)?;
        run_actions(&host, &cfg, &cli.actions.to_action_set())
    }
}

/// Check the host, then load the config. An unsupported host stops before
/// anything (the default config file included) is written.
fn prepare(
    check: impl FnOnce() -> appup_core::Result<HostEnvironment>,
    load: impl FnOnce() -> Result<AppupConfig>,
) -> Result<(HostEnvironment, AppupConfig)> {
    let host = check()?;
    let cfg = load()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok((host, cfg))
}

#[cfg(test)]
mod tests;
