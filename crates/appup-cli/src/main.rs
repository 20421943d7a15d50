use appup_core::{config, logging};

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Initialize logging as early as possible; fall back to stderr.
    let file_logging = config::log_path().and_then(|path| logging::init_logging(&path));
    if file_logging.is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    match CliCommand::run_from_args() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("appup error: {:#}", err);
            std::process::exit(1);
        }
    }
}
