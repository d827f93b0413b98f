//! Task lifecycle states.

use std::fmt;

use serde::Serialize;

/// Lifecycle of one download task.
///
/// `Extracting`, `Progressing` and `Downloading` are the running phases; the
/// last three states are terminal and never left once entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// No work has started.
    Idle,
    /// Running: reading fields from the input text.
    Extracting,
    /// Running: paced progress phase.
    Progressing,
    /// Running: streaming the resource to disk.
    Downloading,
    /// The file was fully written.
    Succeeded,
    /// Cancellation was observed at a checkpoint.
    Cancelled,
    /// An unrecoverable error ended the run.
    Failed,
}

impl TaskState {
    /// Returns true for `Succeeded`, `Cancelled` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Cancelled | Self::Failed)
    }

    /// Returns true for the three running phases.
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Extracting | Self::Progressing | Self::Downloading)
    }

    /// Returns the lowercase state name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Progressing => "progressing",
            Self::Downloading => "downloading",
            Self::Succeeded => "succeeded",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
