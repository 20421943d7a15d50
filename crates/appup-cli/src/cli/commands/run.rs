//! Action runs: fetch / configure / status / remove.

use anyhow::Result;
use appup_core::config::AppupConfig;
use appup_core::downloader::ProgressStats;
use appup_core::environment::HostEnvironment;
use appup_core::integration::Integration;
use appup_core::layout::Layout;
use appup_core::orchestrator::{ActionSet, FetchOutcome, Installer, RunReport};
use appup_core::remote::CurlRemote;
use std::time::Duration;

use super::progress::ProgressPrinter;

/// Runs one pass of `actions`. Returns `Ok(false)` if a launcher or the shim
/// could not be written.
pub fn run_actions(host: &HostEnvironment, cfg: &AppupConfig, actions: &ActionSet) -> Result<bool> {
    let layout = Layout::from_config(cfg)?;
    let integration = Integration::from_config(cfg);
    let remote = CurlRemote::new(
        cfg.api_url_for(host.platform),
        cfg.icon_url.clone(),
        Duration::from_secs(cfg.metadata_timeout_secs),
    );

    let mut printer = ProgressPrinter::new();
    let result = Installer::new(&remote, &layout, &integration)
        .run(actions, &mut |stats: &ProgressStats| printer.update(stats));
    printer.finish();
    let report = result?;

    if let Some(status) = &report.status {
        println!("Host: {} (package manager: {})", host.platform, host.package_manager);
        print!("{status}");
        return Ok(true);
    }

    print_report(&report);
    if report.integration_failed() {
        eprintln!("Configuration incomplete; see warnings above.");
        return Ok(false);
    }
    if !actions.is_empty() {
        println!("Done.");
    }
    Ok(true)
}

fn print_report(report: &RunReport) {
    if let Some(removal) = &report.removal {
        if removal.removed.is_empty() {
            println!("Nothing to remove.");
        }
        for p in &removal.removed {
            println!("Removed {}", p.display());
        }
    }
    match &report.fetch {
        Some(FetchOutcome::UpToDate { remote }) => {
            println!("Already up to date ({} {}).", remote.name, remote.fingerprint);
        }
        Some(FetchOutcome::Downloaded { remote, bytes, .. }) => {
            println!(
                "Downloaded {} (version {}, {:.1} MiB).",
                remote.name,
                remote.version,
                *bytes as f64 / 1_048_576.0
            );
        }
        None => {}
    }
    for p in &report.launchers_written {
        println!("Wrote launcher {}", p.display());
    }
    if report.shim_written {
        if let Some(a) = &report.artifact {
            println!("Wrote CLI shim pointing at {}", a.path.display());
        }
    }
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
}
