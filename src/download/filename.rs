//! Destination path derivation for downloads.
//!
//! The file name is the URL text after its last `/`, taken verbatim (query
//! string included). Re-downloading the same URL overwrites the earlier file.

use std::path::{Path, PathBuf};

use url::Url;

use super::error::DownloadError;

/// Validates `url` as an absolute http(s) URL with a host.
pub(crate) fn validate_url(url: &str) -> Result<Url, DownloadError> {
    if url.trim().is_empty() {
        return Err(DownloadError::invalid_url(url, "URL is empty"));
    }

    let parsed = Url::parse(url).map_err(|e| DownloadError::invalid_url(url, e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(DownloadError::invalid_url(
                url,
                format!("scheme '{scheme}' is not supported"),
            ));
        }
    }

    if parsed.host().is_none() {
        return Err(DownloadError::invalid_url(url, "URL has no host"));
    }

    Ok(parsed)
}

/// Returns the text after the last `/` of `url`.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] when that text is empty, `.`/`..`,
/// or contains a backslash.
pub fn file_name_from_url(url: &str) -> Result<&str, DownloadError> {
    let name = url.rsplit('/').next().unwrap_or_default();
    if name.is_empty() {
        return Err(DownloadError::invalid_url(url, "URL has no file name segment"));
    }
    if matches!(name, "." | "..") || name.contains('\\') {
        return Err(DownloadError::invalid_url(
            url,
            format!("'{name}' is not usable as a file name"),
        ));
    }
    Ok(name)
}

/// Returns the destination path for `url` under `output_dir`.
///
/// # Errors
///
/// Same as [`file_name_from_url`].
pub fn destination_path(output_dir: &Path, url: &str) -> Result<PathBuf, DownloadError> {
    Ok(output_dir.join(file_name_from_url(url)?))
}
