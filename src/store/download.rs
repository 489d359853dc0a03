//! Fetch a theme archive over HTTP(S) into a temporary file.

use super::archive::ZIP_MAGIC;
use crate::error::{Result, ThemeError};
use reqwest::redirect::Policy;
use reqwest::Url;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Upper bound for the whole request, body included.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

/// Parse `url`, accepting only `http` and `https`.
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| ThemeError::Validation(format!("invalid theme URL '{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ThemeError::Validation(format!(
            "unsupported URL scheme '{other}' (expected http or https)"
        ))),
    }
}

/// Download `url` and return the archive as a temp file. The file is
/// removed when the handle drops.
pub async fn download(url: &str) -> Result<NamedTempFile> {
    let url = parse_url(url)?;
    let client = reqwest::Client::builder()
        .redirect(Policy::limited(MAX_REDIRECTS))
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| ThemeError::Download(format!("failed to create HTTP client: {e}")))?;

    tracing::info!(url = %url, "Downloading theme archive");
    let response = client
        .get(url.clone())
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| ThemeError::Download(format!("{url}: {e}")))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ThemeError::Download(format!("{url}: {e}")))?;

    check_payload(&bytes)?;

    let mut file = NamedTempFile::new().map_err(|e| ThemeError::Download(e.to_string()))?;
    file.write_all(&bytes)
        .and_then(|()| file.flush())
        .map_err(ThemeError::io(file.path()))?;
    tracing::debug!(bytes = bytes.len(), path = %file.path().display(), "Theme archive downloaded");
    Ok(file)
}

fn check_payload(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(ThemeError::Download("server returned an empty body".to_string()));
    }
    if !bytes.starts_with(ZIP_MAGIC) {
        return Err(ThemeError::Archive(
            "downloaded file is not a zip archive".to_string(),
        ));
    }
    Ok(())
}
