//! Events published by the task coordinator.

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::mpsc;

/// Sending half of the event channel, owned by the coordinator.
pub type EventSender = mpsc::UnboundedSender<TaskEvent>;

/// Receiving half of the event channel, drained by the caller.
pub type EventReceiver = mpsc::UnboundedReceiver<TaskEvent>;

/// Classification of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Stream open/read failure, timeout, or HTTP error status.
    Network,
    /// Directory creation or file write failure.
    Filesystem,
    /// The extracted URL is missing or unusable.
    InvalidUrl,
    /// The worker panicked or the client could not be built.
    Internal,
}

/// A state transition of one task run, tagged with the run id.
///
/// Per run: `Started` comes first, percent values never decrease, and exactly
/// one of `Succeeded`, `Cancelled` or `Failed` comes last.
///
/// Runs may interleave on the channel: the task turns terminal just before its
/// terminal event is sent, so a caller polling state can start the next run and
/// see its `Started` ahead of the previous run's terminal event. Group events by
/// `task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TaskEvent {
    /// The run was accepted.
    Started {
        /// Run id.
        task_id: u64,
    },
    /// Progress phase advanced.
    ProgressUpdated {
        /// Run id.
        task_id: u64,
        /// 0..=100.
        percent: u8,
    },
    /// Fields are known; the download is about to begin.
    MetadataResolved {
        /// Run id.
        task_id: u64,
        /// Title, placeholder when empty.
        title: String,
        /// Attribution, placeholder when empty.
        attribution: String,
        /// URL to be fetched, verbatim.
        url: String,
    },
    /// A network chunk was written to disk.
    BytesTransferred {
        /// Run id.
        task_id: u64,
        /// Total bytes on disk so far.
        bytes_written: u64,
        /// Size announced by the server, when known.
        content_length: Option<u64>,
    },
    /// The file was fully written.
    Succeeded {
        /// Run id.
        task_id: u64,
        /// Title, placeholder when empty.
        title: String,
        /// Attribution, placeholder when empty.
        attribution: String,
        /// Where the file was written.
        file_path: PathBuf,
        /// Size of the file.
        bytes_written: u64,
    },
    /// The run stopped at a cancellation checkpoint.
    Cancelled {
        /// Run id.
        task_id: u64,
    },
    /// The run ended with an error.
    Failed {
        /// Run id.
        task_id: u64,
        /// Error class.
        kind: FailureKind,
        /// Human-readable reason.
        reason: String,
    },
}

impl TaskEvent {
    /// Returns the run id carried by every event.
    #[must_use]
    pub fn task_id(&self) -> u64 {
        match self {
            Self::Started { task_id }
            | Self::ProgressUpdated { task_id, .. }
            | Self::MetadataResolved { task_id, .. }
            | Self::BytesTransferred { task_id, .. }
            | Self::Succeeded { task_id, .. }
            | Self::Cancelled { task_id }
            | Self::Failed { task_id, .. } => *task_id,
        }
    }

    /// Returns true for `Succeeded`, `Cancelled` and `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::Cancelled { .. } | Self::Failed { .. }
        )
    }
}
