//! Error types for the task coordinator.

use thiserror::Error;

use super::event::FailureKind;
use crate::download::DownloadError;

/// Synchronous rejections from [`TaskCoordinator::start`](super::TaskCoordinator::start).
///
/// No task is created and no event is published when these are returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// The input text is empty or whitespace only.
    #[error("input required: paste the JSON text before starting")]
    InputRequired,

    /// Another run has not reached a terminal state yet.
    #[error("task {task_id} is still running; cancel it or wait for it to finish")]
    AlreadyRunning {
        /// Id of the run in flight.
        task_id: u64,
    },

    /// `start` was called outside a Tokio runtime.
    #[error("no async runtime available to run the task")]
    NoRuntime,
}

/// Why a background run did not succeed.
#[derive(Debug, Error)]
pub enum TaskFailure {
    /// Cancellation was observed at a checkpoint.
    #[error("task cancelled")]
    Cancelled,

    /// Stream open/read failure, timeout, or HTTP error status.
    #[error("{0}")]
    Network(#[source] DownloadError),

    /// Directory or file write failure.
    #[error("{0}")]
    Filesystem(#[source] DownloadError),

    /// Extracted URL missing or unusable.
    #[error("{0}")]
    InvalidUrl(#[source] DownloadError),

    /// Anything not attributable to the input or environment.
    #[error("internal error: {reason}")]
    Internal {
        /// Description of what went wrong.
        reason: String,
    },
}

impl TaskFailure {
    /// Classifies a download error.
    #[must_use]
    pub fn from_download(error: DownloadError) -> Self {
        match error {
            DownloadError::Cancelled { .. } => Self::Cancelled,
            DownloadError::Io { .. } => Self::Filesystem(error),
            DownloadError::InvalidUrl { .. } => Self::InvalidUrl(error),
            DownloadError::ClientBuild { .. } => Self::Internal {
                reason: error.to_string(),
            },
            DownloadError::Network { .. }
            | DownloadError::Timeout { .. }
            | DownloadError::HttpStatus { .. } => Self::Network(error),
        }
    }

    /// Creates an internal failure.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Returns the failure class, or `None` for cancellation.
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Cancelled => None,
            Self::Network(_) => Some(FailureKind::Network),
            Self::Filesystem(_) => Some(FailureKind::Filesystem),
            Self::InvalidUrl(_) => Some(FailureKind::InvalidUrl),
            Self::Internal { .. } => Some(FailureKind::Internal),
        }
    }
}
