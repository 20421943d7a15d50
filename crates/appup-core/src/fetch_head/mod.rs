//! HTTP HEAD probing of the artifact URL.
//!
//! Uses the curl crate (libcurl) to fetch response headers and capture
//! `Content-Length` and the `ETag` the host assigned to the object.

mod parse;

use std::str;
use std::time::Duration;

use crate::error::{InstallError, Result};

/// Headers of the final response after redirects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResult {
    /// `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
    /// `ETag` with surrounding quotes and CR/LF removed.
    pub etag: Option<String>,
}

/// Performs a HEAD request, following redirects, bounded by `timeout`.
pub fn probe(url: &str, timeout: Duration) -> Result<HeadResult> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer
            .perform()
            .map_err(|e| InstallError::Network(format!("HEAD {url} failed: {e}")))?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(InstallError::Network(format!("HEAD {url} returned HTTP {code}")));
    }
    if headers.iter().all(|l| l.trim().is_empty()) {
        return Err(InstallError::Network(format!("HEAD {url} returned no headers")));
    }

    let head = parse::parse_headers(&headers);
    tracing::debug!(url, ?head, "HEAD probe");
    Ok(head)
}
