//! HTTP download client for streaming files to disk.
//!
//! # Features
//!
//! - Streaming downloads, written in fixed-size chunks
//! - Cooperative cancellation checked before every chunk write
//! - Per-chunk progress callback
//! - File name taken verbatim from the URL's last path segment
//! - Structured error types with full context
//!
//! Partial files are never cleaned up; callers must not assume a complete file
//! unless the download returned `Ok`.

mod client;
mod constants;
mod error;
mod filename;

pub use client::{DownloadFileResult, HttpClient, TransferOptions};
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_CHUNK_SIZE, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::{destination_path, file_name_from_url};
