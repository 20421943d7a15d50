//! Vendor API query: a small JSON document naming the current download URL.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{InstallError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadResponse {
    download_url: Option<String>,
}

/// GET `api_url` and return the `downloadUrl` it names.
pub fn query_download_url(api_url: &str, timeout: Duration) -> Result<String> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(api_url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer
            .perform()
            .map_err(|e| InstallError::Network(format!("GET {api_url} failed: {e}")))?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(InstallError::Protocol(format!(
            "GET {api_url} returned HTTP {code}"
        )));
    }

    parse_download_url(&body)
}

/// Extract `downloadUrl` from the API body. Missing, null or empty is a protocol error.
pub(crate) fn parse_download_url(body: &[u8]) -> Result<String> {
    let resp: DownloadResponse = serde_json::from_slice(body)
        .map_err(|e| InstallError::Protocol(format!("invalid API response: {e}")))?;
    match resp.download_url {
        Some(url) if !url.trim().is_empty() && url.trim() != "null" => Ok(url.trim().to_string()),
        _ => Err(InstallError::Protocol(
            "API response has no downloadUrl".to_string(),
        )),
    }
}
