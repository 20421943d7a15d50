//! Offset writer for temp download files.

use std::fs::File;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::os::unix::fs::FileExt;

use crate::error::{InstallError, Result};

/// Writer for a temp download file.
pub struct StorageWriter {
    file: File,
    temp_path: PathBuf,
}

impl StorageWriter {
    pub(crate) fn from_file_and_path(file: File, temp_path: PathBuf) -> Self {
        Self {
            file,
            temp_path,
        }
    }

    /// Write `data` at `offset`.
    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> Result<()> {
        self.file
            .write_all_at(data, offset)
            .map_err(|e| InstallError::io(&self.temp_path, e))
    }

    #[cfg(not(unix))]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> Result<()> {
        use std::io::{Seek, SeekFrom, Write};
        let mut f = &self.file;
        f.seek(SeekFrom::Start(offset))
            .and_then(|_| f.write_all(data))
            .map_err(|e| InstallError::io(&self.temp_path, e))
    }

    /// Truncate to `len` bytes. Used when preallocation overshot the body.
    pub fn truncate(&self, len: u64) -> Result<()> {
        self.file
            .set_len(len)
            .map_err(|e| InstallError::io(&self.temp_path, e))
    }

    /// Sync file data to disk. Call before `finalize`.
    pub fn sync(&self) -> Result<()> {
        self.file
            .sync_all()
            .map_err(|e| InstallError::io(&self.temp_path, e))
    }

    /// Atomically rename the temp file to `final_path`, closing it.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        let temp_path = self.temp_path.clone();
        drop(self.file);
        std::fs::rename(&temp_path, final_path).map_err(|e| InstallError::io(final_path, e))
    }

    /// Close and delete the temp file after a failed transfer.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::debug!(path = %temp_path.display(), "could not remove temp file: {}", e);
        }
    }
}
