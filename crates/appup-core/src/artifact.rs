//! Descriptors for one concrete build of the application, local or remote.

use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Version reported when no `x.y.z` substring can be found in a file name.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// ETag placeholder when the remote host sent none. Never equal to a real
/// fingerprint, so reconciliation always asks for a download.
pub const UNKNOWN_FINGERPRINT: &str = "unknown";

/// Version tag extracted from an artifact file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionTag {
    Parsed(String),
    /// Extraction failed; displays as `0.0.0`.
    Unknown,
}

impl VersionTag {
    /// Extract the first `N.N.N` substring of `name`.
    pub fn from_name(name: &str) -> Self {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+").expect("static regex"));
        match re.find(name) {
            Some(m) => VersionTag::Parsed(m.as_str().to_string()),
            None => {
                tracing::warn!(name, "no version in artifact name, using {}", DEFAULT_VERSION);
                VersionTag::Unknown
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            VersionTag::Parsed(v) => v,
            VersionTag::Unknown => DEFAULT_VERSION,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, VersionTag::Parsed(_))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current build as advertised by the vendor API. Built fresh on every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArtifact {
    pub download_url: String,
    pub name: String,
    pub size_bytes: u64,
    pub version: VersionTag,
    /// Normalized ETag, or [`UNKNOWN_FINGERPRINT`].
    pub fingerprint: String,
}

/// An artifact found in (or just written to) the storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub version: VersionTag,
    pub fingerprint: String,
}

impl LocalArtifact {
    /// Same content as `other`, by fingerprint alone.
    pub fn same_content(&self, other: &RemoteArtifact) -> bool {
        self.fingerprint == other.fingerprint
    }
}
