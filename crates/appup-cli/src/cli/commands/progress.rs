//! Console rendering of download progress.

use appup_core::downloader::ProgressStats;
use std::io::Write;
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u128 = 500;

/// Prints a single self-overwriting progress line, at most every 500 ms.
#[derive(Default)]
pub struct ProgressPrinter {
    last_print: Option<Instant>,
    printed: bool,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, stats: &ProgressStats) {
        let now = Instant::now();
        let due = self
            .last_print
            .map_or(true, |t| now.duration_since(t).as_millis() >= PROGRESS_INTERVAL_MS);
        let done = stats.total_bytes > 0 && stats.bytes_done >= stats.total_bytes;
        if !due && !done {
            return;
        }
        let done_mib = stats.bytes_done as f64 / 1_048_576.0;
        let rate_mib = stats.bytes_per_sec() / 1_048_576.0;
        let line = if stats.total_bytes > 0 {
            let eta = stats
                .eta_secs()
                .map(|s| format!("{:.0}s", s))
                .unwrap_or_else(|| "?".to_string());
            format!(
                "\r  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}  ",
                done_mib,
                stats.total_bytes as f64 / 1_048_576.0,
                stats.fraction() * 100.0,
                rate_mib,
                eta
            )
        } else {
            format!("\r  {:.1} MiB  {:.2} MiB/s  ", done_mib, rate_mib)
        };
        print!("{line}");
        let _ = std::io::stdout().flush();
        self.last_print = Some(now);
        self.printed = true;
    }

    /// End the progress line if anything was printed.
    pub fn finish(&mut self) {
        if self.printed {
            println!();
            self.printed = false;
        }
    }
}
