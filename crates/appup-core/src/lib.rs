pub mod config;
pub mod error;
pub mod logging;

// Reconciliation engine
pub mod artifact;
pub mod fingerprint;
pub mod reconcile;
pub mod storage;

// Remote side
pub mod downloader;
pub mod fetch_head;
pub mod remote;
pub mod url_model;

// Host integration
pub mod environment;
pub mod integration;
pub mod layout;
pub mod orchestrator;
pub mod status;

pub use error::{InstallError, Result};
