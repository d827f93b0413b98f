//! Error types for the download module.
//!
//! Each variant carries the URL or path it concerns, so messages are useful
//! without extra context at the call site.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during file downloads.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, reset mid-body).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Connect or read timed out.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error (create directory, create file, write, flush).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL is malformed, uses an unsupported scheme, or has no file name.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The cancellation flag was observed before a chunk write.
    #[error("download of {url} cancelled after {bytes_written} bytes")]
    Cancelled {
        /// The URL being downloaded.
        url: String,
        /// Bytes already on disk; the file is left as-is.
        bytes_written: u64,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl DownloadError {
    /// Creates a network error, promoting timeouts to [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a cancellation error.
    pub fn cancelled(url: impl Into<String>, bytes_written: u64) -> Self {
        Self::Cancelled {
            url: url.into(),
            bytes_written,
        }
    }

    /// Returns true for local filesystem failures.
    #[must_use]
    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true for failures talking to the server.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the URL
// or path, which the source errors do not carry.
