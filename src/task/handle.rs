//! Shared state of one task run.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::state::TaskState;

/// One run of the background operation.
///
/// The coordinator and worker drive it; callers hold an `Arc` to query state and
/// progress and to request cancellation. Cancellation is the only write callers
/// can perform.
#[derive(Debug)]
pub struct DownloadTask {
    id: u64,
    state: watch::Sender<TaskState>,
    progress: AtomicU8,
    cancel_requested: CancellationToken,
    url: OnceLock<String>,
    destination: OnceLock<PathBuf>,
}

impl DownloadTask {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            state: watch::Sender::new(TaskState::Extracting),
            progress: AtomicU8::new(0),
            cancel_requested: CancellationToken::new(),
            url: OnceLock::new(),
            destination: OnceLock::new(),
        }
    }

    /// Returns the run id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    /// Returns progress in percent, 0..=100.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    /// Returns the extracted URL once extraction has run.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.get().map(String::as_str)
    }

    /// Returns the destination path once the download phase has started.
    #[must_use]
    pub fn destination(&self) -> Option<&Path> {
        self.destination.get().map(PathBuf::as_path)
    }

    /// Requests cancellation. Idempotent; a no-op once the task is terminal.
    ///
    /// Does not wait: the worker stops at its next checkpoint.
    pub fn cancel(&self) {
        if self.state().is_terminal() {
            return;
        }
        if !self.cancel_requested.is_cancelled() {
            debug!(task_id = self.id, "cancellation requested");
        }
        // Also wakes any checkpoint awaiting a network read or a pause.
        self.cancel_requested.cancel();
    }

    /// Returns true once [`cancel`](Self::cancel) has taken effect on the flag.
    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.is_cancelled()
    }

    /// Waits until the task is terminal and returns the terminal state.
    pub async fn wait(&self) -> TaskState {
        let mut receiver = self.state.subscribe();
        match receiver.wait_for(|state| state.is_terminal()).await {
            Ok(state) => *state,
            // The sender lives in `self`, so it cannot be dropped while borrowed.
            Err(_) => self.state(),
        }
    }

    pub(crate) fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_requested
    }

    pub(crate) fn set_url(&self, url: String) {
        let _ = self.url.set(url);
    }

    pub(crate) fn set_destination(&self, path: PathBuf) {
        let _ = self.destination.set(path);
    }

    /// Raises progress to `percent` (clamped to 100). Never lowers it.
    pub(crate) fn advance_progress(&self, percent: u8) -> u8 {
        let percent = percent.min(100);
        self.progress.fetch_max(percent, Ordering::SeqCst).max(percent)
    }

    /// Moves to `next` unless already terminal. Returns whether the state changed.
    pub(crate) fn transition(&self, next: TaskState) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_terminal() || *state == next {
                return false;
            }
            *state = next;
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_starts_extracting() {
        let task = DownloadTask::new(1);
        assert_eq!(task.id(), 1);
        assert_eq!(task.state(), TaskState::Extracting);
        assert_eq!(task.progress(), 0);
        assert!(task.url().is_none());
        assert!(task.destination().is_none());
    }

    #[test]
    fn test_progress_never_decreases() {
        let task = DownloadTask::new(1);
        assert_eq!(task.advance_progress(40), 40);
        assert_eq!(task.advance_progress(20), 40);
        assert_eq!(task.progress(), 40);
        assert_eq!(task.advance_progress(250), 100);
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let task = DownloadTask::new(1);
        assert!(task.transition(TaskState::Cancelled));
        assert!(!task.transition(TaskState::Succeeded));
        assert!(!task.transition(TaskState::Downloading));
        assert_eq!(task.state(), TaskState::Cancelled);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let task = DownloadTask::new(1);
        task.cancel();
        task.cancel();
        assert!(task.is_cancel_requested());
    }

    #[test]
    fn test_cancel_after_terminal_is_noop() {
        let task = DownloadTask::new(1);
        task.transition(TaskState::Succeeded);
        task.cancel();
        assert!(!task.is_cancel_requested());
    }

    #[test]
    fn test_url_is_set_once() {
        let task = DownloadTask::new(1);
        task.set_url("https://e.com/a.png".to_string());
        task.set_url("https://e.com/b.png".to_string());
        assert_eq!(task.url(), Some("https://e.com/a.png"));
    }

    #[tokio::test]
    async fn test_cancel_wakes_pending_checkpoints() {
        let task = std::sync::Arc::new(DownloadTask::new(1));
        let waiter = {
            let task = std::sync::Arc::clone(&task);
            tokio::spawn(async move { task.cancel_token().cancelled().await })
        };
        task.cancel();
        let woke = tokio::time::timeout(std::time::Duration::from_secs(1), waiter).await;
        assert!(matches!(woke, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_wait_returns_terminal_state() {
        let task = std::sync::Arc::new(DownloadTask::new(1));
        let waiter = {
            let task = std::sync::Arc::clone(&task);
            tokio::spawn(async move { task.wait().await })
        };
        task.transition(TaskState::Progressing);
        task.transition(TaskState::Failed);
        let state = waiter.await.unwrap_or(TaskState::Idle);
        assert_eq!(state, TaskState::Failed);
    }
}
