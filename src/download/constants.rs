//! Constants for the download module (timeouts, chunking).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes between body reads).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default number of bytes written per chunk; cancellation is checked before each.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
