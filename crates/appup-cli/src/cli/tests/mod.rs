//! CLI parse tests.

use super::{Cli, CliCommand};
use appup_core::orchestrator::{Action, ActionSet};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

pub(super) fn actions(args: &[&str]) -> ActionSet {
    parse(args).actions.to_action_set()
}


#[test]
fn cli_parse_fingerprint() {
    match parse(&["appup", "fingerprint", "/tmp/Cursor-1.0.0.AppImage"]).command {
        Some(CliCommand::Fingerprint { path }) => {
            assert_eq!(path, std::path::Path::new("/tmp/Cursor-1.0.0.AppImage"))
        }
        _ => panic!("expected Fingerprint"),
    }
}

#[test]
fn cli_subcommand_conflicts_with_flags() {
    assert!(Cli::try_parse_from(["appup", "--fetch", "fingerprint", "/tmp/x"]).is_err());
}

#[test]
fn cli_no_args_is_status() {
    let cli = parse(&["appup"]);
    assert!(cli.command.is_none());
    assert_eq!(cli.actions.to_action_set(), ActionSet::new().with(Action::Status));
}

#[test]
fn unsupported_host_stops_before_config_is_loaded() {
    use appup_core::InstallError;
    use std::cell::Cell;

    let loaded = Cell::new(false);
    let err = super::prepare(
        || {
            Err(InstallError::UnsupportedEnvironment(
                "architecture riscv64 is not supported".to_string(),
            ))
        },
        || {
            loaded.set(true);
            Ok(appup_core::config::AppupConfig::default())
        },
    )
    .unwrap_err();
    assert!(!loaded.get());
    assert!(matches!(
        err.downcast_ref::<InstallError>(),
        Some(InstallError::UnsupportedEnvironment(_))
    ));
}

#[test]
fn supported_host_loads_config() {
    use appup_core::environment::{HostEnvironment, PackageManager};

    let (host, cfg) = super::prepare(
        || {
            Ok(HostEnvironment {
                platform: "linux-x64",
                package_manager: PackageManager::Apt,
            })
        },
        || Ok(appup_core::config::AppupConfig::default()),
    )
    .unwrap();
    assert_eq!(host.platform, "linux-x64");
    assert_eq!(cfg.app_name, "cursor");
}
