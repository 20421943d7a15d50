//! Remote side of reconciliation: which build the vendor currently serves and
//! how to fetch it.
//!
//! The orchestrator only depends on the [`Remote`] trait; [`CurlRemote`] is
//! the libcurl-backed implementation.

pub mod api;

use std::path::Path;
use std::time::Duration;

use crate::artifact::{RemoteArtifact, VersionTag, UNKNOWN_FINGERPRINT};
use crate::downloader::{self, ProgressFn, ProgressStats};
use crate::error::{InstallError, Result};
use crate::fetch_head::{self, HeadResult};
use crate::url_model::filename_from_url_path;

/// Everything the orchestrator needs from the network.
pub trait Remote {
    /// Query the vendor API and HEAD the artifact. Not cached across calls.
    fn resolve(&self) -> Result<RemoteArtifact>;

    /// Stream the artifact to `dest`, returning bytes written.
    fn download(
        &self,
        artifact: &RemoteArtifact,
        dest: &Path,
        progress: &mut ProgressFn<'_>,
    ) -> Result<u64>;

    /// Fetch the application icon to `dest`.
    fn fetch_icon(&self, dest: &Path) -> Result<()>;
}

/// Endpoints and timeouts for [`CurlRemote`].
#[derive(Debug, Clone)]
pub struct CurlRemote {
    pub api_url: String,
    pub icon_url: String,
    /// Bound for the API query and the HEAD probe.
    pub metadata_timeout: Duration,
}

impl CurlRemote {
    pub fn new(api_url: impl Into<String>, icon_url: impl Into<String>, metadata_timeout: Duration) -> Self {
        Self {
            api_url: api_url.into(),
            icon_url: icon_url.into(),
            metadata_timeout,
        }
    }
}

impl Remote for CurlRemote {
    fn resolve(&self) -> Result<RemoteArtifact> {
        let download_url = api::query_download_url(&self.api_url, self.metadata_timeout)?;
        tracing::debug!(%download_url, "API resolved download URL");
        let head = fetch_head::probe(&download_url, self.metadata_timeout)?;
        describe_remote(download_url, &head)
    }

    fn download(
        &self,
        artifact: &RemoteArtifact,
        dest: &Path,
        progress: &mut ProgressFn<'_>,
    ) -> Result<u64> {
        downloader::download_to(&artifact.download_url, dest, artifact.size_bytes, progress)
    }

    fn fetch_icon(&self, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| InstallError::io(parent, e))?;
        }
        downloader::download_to(&self.icon_url, dest, 0, &mut |_: &ProgressStats| {})?;
        // The icon does not need the executable bit the downloader sets.
        set_regular_mode(dest)
    }
}

#[cfg(unix)]
fn set_regular_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
        .map_err(|e| InstallError::io(path, e))
}

#[cfg(not(unix))]
fn set_regular_mode(_path: &Path) -> Result<()> {
    Ok(())
}

/// Build the remote descriptor from the download URL and its HEAD headers.
pub fn describe_remote(download_url: String, head: &HeadResult) -> Result<RemoteArtifact> {
    let name = filename_from_url_path(&download_url).ok_or_else(|| {
        InstallError::Protocol(format!("download URL has no file name: {download_url}"))
    })?;
    let fingerprint = match &head.etag {
        Some(etag) => etag.clone(),
        None => {
            tracing::warn!(%download_url, "no ETag on artifact; treating content as changed");
            UNKNOWN_FINGERPRINT.to_string()
        }
    };
    Ok(RemoteArtifact {
        version: VersionTag::from_name(&name),
        size_bytes: head.content_length.unwrap_or(0),
        download_url,
        name,
        fingerprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://downloads.example.com/production/linux/x64/Cursor-1.2.4-x86_64.AppImage";

    #[test]
    fn describe_remote_full_headers() {
        let head = HeadResult {
            content_length: Some(1234),
            etag: Some("abc123-2".to_string()),
        };
        let r = describe_remote(URL.to_string(), &head).unwrap();
        assert_eq!(r.name, "Cursor-1.2.4-x86_64.AppImage");
        assert_eq!(r.version.as_str(), "1.2.4");
        assert_eq!(r.size_bytes, 1234);
        assert_eq!(r.fingerprint, "abc123-2");
    }

    #[test]
    fn describe_remote_missing_headers_degrades() {
        let r = describe_remote(URL.to_string(), &HeadResult::default()).unwrap();
        assert_eq!(r.size_bytes, 0);
        assert_eq!(r.fingerprint, UNKNOWN_FINGERPRINT);
    }

    #[test]
    fn describe_remote_without_file_name_is_protocol_error() {
        let err = describe_remote("https://downloads.example.com/".to_string(), &HeadResult::default())
            .unwrap_err();
        assert!(matches!(err, InstallError::Protocol(_)));
    }
}
