//! Picfetch Core Library
//!
//! Pulls a title, an attribution and an image URL out of loosely structured
//! text, then fetches the image in the background with observable progress and
//! cooperative cancellation.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`extract`] - Pattern-based field extraction (never fails)
//! - [`download`] - Streaming HTTP download with chunked, cancellable writes
//! - [`task`] - Single-flight task coordinator publishing lifecycle events
//! - [`config`] - Validated runtime settings

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod extract;
pub mod task;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, HttpTimeouts, TaskConfig};
pub use download::{DownloadError, HttpClient};
pub use extract::{Extraction, FieldPattern, FieldPatterns, PatternError, extract};
pub use task::{
    DownloadTask, EventReceiver, FailureKind, StartError, TaskCoordinator, TaskEvent, TaskState,
};
