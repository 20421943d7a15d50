//! `appup fingerprint <path>`: print the chunked content fingerprint of a file.

use anyhow::Result;
use appup_core::fingerprint;
use std::path::Path;

pub fn run_fingerprint(path: &Path) -> Result<()> {
    let fp = fingerprint::compute_fingerprint(path)?;
    println!("{}  {}", fp, path.display());
    Ok(())
}
