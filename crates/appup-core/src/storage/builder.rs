//! Builder for creating and preallocating temp download files.

use std::fs::File;
use std::path::{Path, PathBuf};

use super::writer::StorageWriter;
use crate::error::{InstallError, Result};
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

/// Builder for a new temp download file. Call `preallocate` then `build`.
pub struct StorageWriterBuilder {
    file: File,
    temp_path: PathBuf,
}

impl StorageWriterBuilder {
    /// Create a new temp file at `temp_path`. Truncates a leftover from an
    /// interrupted run.
    pub fn create(temp_path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .map_err(|e| InstallError::io(temp_path, e))?;
        Ok(StorageWriterBuilder {
            file,
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Preallocate `size` bytes. On Unix tries `posix_fallocate`; falls back
    /// to `set_len` on failure or non-Unix.
    pub fn preallocate(&mut self, size: u64) -> Result<()> {
        if size == 0 {
            return Ok(());
        }
        #[cfg(unix)]
        {
            let fd = self.file.as_raw_fd();
            let r = unsafe { libc::posix_fallocate(fd, 0, size as libc::off_t) };
            if r == 0 {
                return Ok(());
            }
            tracing::debug!(errno = r, "posix_fallocate failed, falling back to set_len");
        }
        self.file
            .set_len(size)
            .map_err(|e| InstallError::io(&self.temp_path, e))
    }

    pub fn build(self) -> StorageWriter {
        StorageWriter::from_file_and_path(self.file, self.temp_path)
    }
}
