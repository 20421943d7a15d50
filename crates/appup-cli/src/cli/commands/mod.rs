//! CLI command handlers.

mod fingerprint;
mod progress;
mod run;

pub use fingerprint::run_fingerprint;
pub use run::run_actions;
