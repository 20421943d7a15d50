//! Artifact storage directory: temp-file writes for downloads and scanning
//! for the newest deposited artifact.
//!
//! Downloads land in `<name>.part` (preallocated with `posix_fallocate` when
//! the size is known), are synced, then atomically renamed to the final name
//! and marked executable.

mod builder;
mod locate;
mod writer;

pub use builder::StorageWriterBuilder;
pub use locate::{list_artifacts, list_partials, locate_local, ArtifactPattern};
pub use writer::StorageWriter;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstallError, Result};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Set mode 0755 on the artifact.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| InstallError::io(path, e))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Create the storage directory if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| InstallError::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("/tmp/Cursor-1.0.0-x86_64.AppImage"));
        assert_eq!(p.to_string_lossy(), "/tmp/Cursor-1.0.0-x86_64.AppImage.part");
    }

    #[test]
    fn create_preallocate_write_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("Cursor-1.0.0.AppImage");
        let tp = temp_path(&final_path);

        let mut builder = StorageWriterBuilder::create(&tp).unwrap();
        builder.preallocate(10).unwrap();
        let writer = builder.build();
        writer.write_at(0, b"hello").unwrap();
        writer.write_at(5, b"world").unwrap();
        writer.sync().unwrap();
        writer.finalize(&final_path).unwrap();

        assert!(!tp.exists());
        let mut buf = String::new();
        fs::File::open(&final_path)
            .unwrap()
            .read_to_string(&mut buf)
            .unwrap();
        assert_eq!(buf, "helloworld");
    }

    #[test]
    fn discard_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let tp = dir.path().join("x.AppImage.part");
        let writer = StorageWriterBuilder::create(&tp).unwrap().build();
        writer.write_at(0, b"partial").unwrap();
        writer.discard();
        assert!(!tp.exists());
    }

    #[cfg(unix)]
    #[test]
    fn make_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.AppImage");
        fs::write(&p, b"#!").unwrap();
        make_executable(&p).unwrap();
        let mode = fs::metadata(&p).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/Applications");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
