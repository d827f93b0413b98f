//! HTTP client wrapper for downloading files.
//!
//! This module provides the `HttpClient` struct which streams a response body
//! to disk in fixed-size chunks, checking a cancellation flag before each write.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::constants::DEFAULT_CHUNK_SIZE;
use super::error::DownloadError;
use super::filename::{destination_path, validate_url};
use crate::config::HttpTimeouts;
use crate::user_agent;

/// HTTP client for downloading files with streaming support.
///
/// Create once and reuse; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use picfetch_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let download = client.download_to_file("https://example.com/cat.png", Path::new("img")).await?;
/// println!("Downloaded to: {}", download.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFileResult {
    /// Final output path.
    pub path: PathBuf,
    /// Bytes written to `path`.
    pub bytes_written: u64,
}

/// Per-transfer knobs for [`HttpClient::download_to_file_with_progress`].
#[derive(Debug, Clone, Copy)]
pub struct TransferOptions<'a> {
    /// Bytes written per chunk; values below 1 are treated as 1.
    pub chunk_size: usize,
    /// Checked before each chunk write and raced against every network wait;
    /// once cancelled the transfer stops.
    pub cancel: &'a CancellationToken,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(HttpTimeouts::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the TLS backend or resolver
    /// cannot be initialised.
    #[instrument(level = "debug")]
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Result<Self, DownloadError> {
        let mut builder = Client::builder()
            .connect_timeout(timeouts.connect)
            .gzip(true)
            .user_agent(user_agent::default_user_agent());
        if let Some(read) = timeouts.read {
            builder = builder.read_timeout(read);
        }
        let client = builder
            .build()
            .map_err(|source| DownloadError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Downloads `url` into `output_dir` without progress reporting or cancellation.
    ///
    /// # Errors
    ///
    /// Same as [`download_to_file_with_progress`](Self::download_to_file_with_progress).
    #[must_use = "download result contains the path to the downloaded file"]
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download_to_file(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<DownloadFileResult, DownloadError> {
        let never = CancellationToken::new();
        let options = TransferOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cancel: &never,
        };
        self.download_to_file_with_progress(url, output_dir, options, |_, _| {})
            .await
    }

    /// Downloads `url` into `output_dir`, writing `options.chunk_size` bytes at a time.
    ///
    /// The directory is created if absent and the file is named after the URL's
    /// last path segment. `on_progress(bytes_written, content_length)` runs after
    /// each network chunk has been written. A partial file is left in place on
    /// cancellation or failure.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid or has no file name segment
    /// - The request fails (network error, timeout) or returns 4xx/5xx
    /// - Creating the directory or writing the file fails
    /// - `options.cancel` fires before the transfer completes
    ///   ([`DownloadError::Cancelled`])
    #[instrument(skip(self, options, on_progress), fields(url = %url, output_dir = %output_dir.display()))]
    pub async fn download_to_file_with_progress<F>(
        &self,
        url: &str,
        output_dir: &Path,
        options: TransferOptions<'_>,
        on_progress: F,
    ) -> Result<DownloadFileResult, DownloadError>
    where
        F: FnMut(u64, Option<u64>),
    {
        debug!("starting download");

        validate_url(url)?;
        let file_path = destination_path(output_dir, url)?;

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| DownloadError::io(output_dir, e))?;

        let response = tokio::select! {
            biased;
            () = options.cancel.cancelled() => {
                debug!("cancellation observed before the response arrived");
                return Err(DownloadError::cancelled(url, 0));
            }
            response = self.send_request(url) => response?,
        };
        let content_length = response.content_length();
        debug!(path = %file_path.display(), ?content_length, "resolved output path");

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let bytes_written = stream_to_file(
            &mut file,
            response,
            url,
            &file_path,
            options,
            content_length,
            on_progress,
        )
        .await?;

        info!(
            path = %file_path.display(),
            bytes = bytes_written,
            "download complete"
        );

        Ok(DownloadFileResult {
            path: file_path,
            bytes_written,
        })
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "server returned error status");
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }

}

/// Streams the response body to `file` in `options.chunk_size` pieces.
///
/// The cancellation flag is checked before every piece; on cancellation the
/// bytes written so far are flushed and [`DownloadError::Cancelled`] returned.
async fn stream_to_file<F>(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    options: TransferOptions<'_>,
    content_length: Option<u64>,
    mut on_progress: F,
) -> Result<u64, DownloadError>
where
    F: FnMut(u64, Option<u64>),
{
    let chunk_size = options.chunk_size.max(1);
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            () = options.cancel.cancelled() => None,
            next = stream.next() => Some(next),
        };
        let Some(next) = next else {
            debug!(bytes_written, "cancellation observed while waiting for data");
            return Err(abandon(&mut writer, url, bytes_written).await);
        };
        let Some(chunk_result) = next else {
            break;
        };
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        for piece in chunk.chunks(chunk_size) {
            if options.cancel.is_cancelled() {
                debug!(bytes_written, "cancellation observed mid-transfer");
                return Err(abandon(&mut writer, url, bytes_written).await);
            }

            writer
                .write_all(piece)
                .await
                .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;
            bytes_written += piece.len() as u64;
        }

        on_progress(bytes_written, content_length);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

/// Flushes what was written so far, best effort, and builds the cancellation error.
async fn abandon(
    writer: &mut BufWriter<&mut File>,
    url: &str,
    bytes_written: u64,
) -> DownloadError {
    if let Err(e) = writer.flush().await {
        debug!(error = %e, "flush after cancellation failed");
    }
    DownloadError::cancelled(url, bytes_written)
}
