//! Scan the storage directory for deposited artifacts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::TEMP_SUFFIX;
use crate::artifact::{LocalArtifact, VersionTag};
use crate::error::{InstallError, Result};
use crate::fingerprint::compute_fingerprint;

/// File name pattern for this application's artifacts: `<prefix>*<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPattern {
    pub prefix: String,
    pub suffix: String,
}

impl ArtifactPattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.len() >= self.prefix.len() + self.suffix.len()
            && name.starts_with(&self.prefix)
            && name.ends_with(&self.suffix)
    }

    fn matches_partial(&self, name: &str) -> bool {
        name.strip_suffix(TEMP_SUFFIX)
            .is_some_and(|base| self.matches(base))
    }
}

struct Candidate {
    path: PathBuf,
    name: String,
    modified: SystemTime,
    size: u64,
}

/// Regular files directly in `dir` whose name satisfies `keep`.
fn scan(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<Candidate>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(InstallError::io(dir, e)),
    };
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| InstallError::io(dir, e))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !keep(&name) {
            continue;
        }
        let path = entry.path();
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            // Dangling symlink, or removed since read_dir.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "skipping vanished candidate");
                continue;
            }
            Err(e) => return Err(InstallError::io(&path, e)),
        };
        if !meta.is_file() {
            continue;
        }
        out.push(Candidate {
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            size: meta.len(),
            path,
            name,
        });
    }
    Ok(out)
}

/// All artifacts in `dir` matching `pattern`, sorted by path.
pub fn list_artifacts(dir: &Path, pattern: &ArtifactPattern) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = scan(dir, |n| pattern.matches(n))?
        .into_iter()
        .map(|c| c.path)
        .collect();
    paths.sort();
    Ok(paths)
}

/// Leftover `.part` files from interrupted downloads.
pub fn list_partials(dir: &Path, pattern: &ArtifactPattern) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = scan(dir, |n| pattern.matches_partial(n))?
        .into_iter()
        .map(|c| c.path)
        .collect();
    paths.sort();
    Ok(paths)
}

/// Find the most recently modified artifact in `storage_dir` (created if absent)
/// and describe it, fingerprint included.
///
/// Equal modification times are broken by the lexicographically greatest
/// file name. `Ok(None)` means nothing is installed yet.
pub fn locate_local(storage_dir: &Path, pattern: &ArtifactPattern) -> Result<Option<LocalArtifact>> {
    super::ensure_dir(storage_dir)?;
    let newest = scan(storage_dir, |n| pattern.matches(n))?
        .into_iter()
        .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)));

    let Some(c) = newest else {
        tracing::debug!(dir = %storage_dir.display(), "no local artifact");
        return Ok(None);
    };

    let fingerprint = compute_fingerprint(&c.path)?;
    tracing::debug!(path = %c.path.display(), %fingerprint, "located local artifact");
    Ok(Some(LocalArtifact {
        version: VersionTag::from_name(&c.name),
        path: c.path,
        name: c.name,
        size_bytes: c.size,
        fingerprint,
    }))
}
