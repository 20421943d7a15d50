//! Single-stream HTTP GET of the artifact into the storage directory.
//!
//! The body is written sequentially to `<dest>.part`, which is synced and
//! renamed to `dest` only after a complete transfer. The final file is marked
//! executable.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::{InstallError, Result};
use crate::storage::{self, StorageWriter, StorageWriterBuilder};

/// Snapshot of download progress (CLI-friendly).
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Bytes written so far.
    pub bytes_done: u64,
    /// Total size in bytes; 0 when the server did not say.
    pub total_bytes: u64,
    /// Elapsed time since download start (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if the rate or total is unknown).
    pub fn eta_secs(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            return None;
        }
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0]; 0 when the total is unknown.
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}

/// Callback receiving progress after every received block.
pub type ProgressFn<'a> = dyn FnMut(&ProgressStats) + 'a;

/// Downloads `url` to `dest`. `expected_len` (from the HEAD probe, 0 = unknown)
/// is used for preallocation and to detect short transfers.
/// Returns the number of bytes written.
pub fn download_to(
    url: &str,
    dest: &Path,
    expected_len: u64,
    progress: &mut ProgressFn<'_>,
) -> Result<u64> {
    let temp = storage::temp_path(dest);
    let mut builder = StorageWriterBuilder::create(&temp)?;
    builder.preallocate(expected_len)?;
    let writer = builder.build();

    match transfer(url, &writer, expected_len, progress) {
        Ok(written) => {
            writer.truncate(written)?;
            writer.sync()?;
            writer.finalize(dest)?;
            storage::make_executable(dest)?;
            tracing::info!(url, dest = %dest.display(), bytes = written, "download complete");
            Ok(written)
        }
        Err(e) => {
            writer.discard();
            Err(e)
        }
    }
}

fn transfer(
    url: &str,
    writer: &StorageWriter,
    expected_len: u64,
    progress: &mut ProgressFn<'_>,
) -> Result<u64> {
    let mut offset: u64 = 0;
    let mut write_error: Option<InstallError> = None;
    let started = Instant::now();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    // No overall timeout; abort only a stalled connection.
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match writer.write_at(offset, data) {
            Ok(()) => {
                offset += data.len() as u64;
                progress(&ProgressStats {
                    bytes_done: offset,
                    total_bytes: expected_len,
                    elapsed_secs: started.elapsed().as_secs_f64(),
                });
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(e);
    }
    performed.map_err(|e| InstallError::Network(format!("GET {url} failed: {e}")))?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(InstallError::Network(format!("GET {url} returned HTTP {code}")));
    }
    if expected_len > 0 && offset != expected_len {
        return Err(InstallError::Network(format!(
            "partial transfer: wrote {offset} of {expected_len} bytes"
        )));
    }
    Ok(offset)
}
