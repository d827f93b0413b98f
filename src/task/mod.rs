//! Single-flight background task coordination.
//!
//! The [`TaskCoordinator`] owns at most one in-flight [`DownloadTask`]. A run
//! extracts title, attribution and URL from the input text, reports paced
//! progress, then streams the image to disk. Every transition is published as a
//! [`TaskEvent`] on a channel the caller drains on its own context.
//!
//! # Concurrency Model
//!
//! - `start` is synchronous: it validates, publishes `Started`, spawns, returns
//! - The worker runs in its own Tokio task under a supervisor task
//! - The supervisor turns the worker's result (or panic) into exactly one
//!   terminal state and event
//! - The terminal state is stored before the terminal event is sent
//! - Cancellation is a flag checked before each progress step, before the
//!   download, and before each chunk write
//!
//! # Example
//!
//! ```no_run
//! use picfetch_core::config::TaskConfig;
//! use picfetch_core::download::HttpClient;
//! use picfetch_core::task::{TaskCoordinator, TaskEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (coordinator, mut events) = TaskCoordinator::new(HttpClient::new(), TaskConfig::default())?;
//! coordinator.start(r#"{"title": "Cat", "url": "https://example.com/cat.png"}"#)?;
//! while let Some(event) = events.recv().await {
//!     if event.is_terminal() {
//!         println!("{event:?}");
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod event;
mod handle;
mod state;
mod worker;

pub use error::{StartError, TaskFailure};
pub use event::{EventReceiver, EventSender, FailureKind, TaskEvent};
pub use handle::DownloadTask;
pub use state::TaskState;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigError, TaskConfig};
use crate::download::HttpClient;
use crate::extract::FieldPatterns;
use worker::{TaskOutput, WorkerContext};

/// Owns the single in-flight download task.
#[derive(Debug)]
pub struct TaskCoordinator {
    client: HttpClient,
    config: Arc<TaskConfig>,
    patterns: Arc<FieldPatterns>,
    events: EventSender,
    current: Mutex<Option<Arc<DownloadTask>>>,
    next_id: AtomicU64,
}

impl TaskCoordinator {
    /// Creates a coordinator and the receiver for its events.
    ///
    /// Uses [`FieldPatterns::image_metadata`] for extraction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    #[instrument(level = "debug", skip(client))]
    pub fn new(
        client: HttpClient,
        config: TaskConfig,
    ) -> Result<(Self, EventReceiver), ConfigError> {
        config.validate()?;
        let (events, receiver) = mpsc::unbounded_channel();
        let coordinator = Self {
            client,
            config: Arc::new(config),
            patterns: Arc::new(FieldPatterns::image_metadata()),
            events,
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        };
        Ok((coordinator, receiver))
    }

    /// Replaces the extraction patterns used by later runs.
    ///
    /// The worker reads the title, attribution and url fields; other fields are ignored.
    #[must_use]
    pub fn with_patterns(mut self, patterns: FieldPatterns) -> Self {
        self.patterns = Arc::new(patterns);
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// Starts a run for `text` and returns immediately.
    ///
    /// Publishes `Started` before any work happens in the background.
    ///
    /// # Errors
    ///
    /// - [`StartError::InputRequired`] if `text` is blank
    /// - [`StartError::AlreadyRunning`] if the current run is not terminal
    /// - [`StartError::NoRuntime`] if called outside a Tokio runtime
    #[instrument(skip(self, text), fields(input_len = text.len()))]
    pub fn start(&self, text: &str) -> Result<Arc<DownloadTask>, StartError> {
        if text.trim().is_empty() {
            debug!("rejecting blank input");
            return Err(StartError::InputRequired);
        }

        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| StartError::NoRuntime)?;

        let task = {
            let mut current = self
                .current
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(running) = current.as_ref()
                && !running.state().is_terminal()
            {
                debug!(task_id = running.id(), "rejecting start while a task is in flight");
                return Err(StartError::AlreadyRunning {
                    task_id: running.id(),
                });
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let task = Arc::new(DownloadTask::new(id));
            *current = Some(Arc::clone(&task));
            task
        };

        info!(task_id = task.id(), "task started");
        let _ = self.events.send(TaskEvent::Started { task_id: task.id() });

        let ctx = WorkerContext {
            client: self.client.clone(),
            config: Arc::clone(&self.config),
            patterns: Arc::clone(&self.patterns),
            events: self.events.clone(),
        };
        runtime.spawn(supervise(Arc::clone(&task), text.to_string(), ctx));

        Ok(task)
    }

    /// Requests cancellation of the current run. No-op when nothing is running.
    pub fn cancel(&self) {
        match self.current() {
            Some(task) if !task.state().is_terminal() => task.cancel(),
            _ => debug!("cancel requested with no task in flight"),
        }
    }

    /// Returns the most recent task, terminal or not.
    #[must_use]
    pub fn current(&self) -> Option<Arc<DownloadTask>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true while a run is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.current()
            .is_some_and(|task| !task.state().is_terminal())
    }
}

/// Runs the worker in its own task so a panic is contained, then publishes
/// the single terminal state and event.
async fn supervise(task: Arc<DownloadTask>, text: String, ctx: WorkerContext) {
    let events = ctx.events.clone();
    let joined = tokio::spawn(worker::run(Arc::clone(&task), text, ctx)).await;
    let outcome = joined.unwrap_or_else(|join_error| {
        warn!(task_id = task.id(), error = %join_error, "worker task panicked");
        Err(TaskFailure::internal(format!("worker task panicked: {join_error}")))
    });
    finish(&task, &events, outcome);
}

fn finish(task: &DownloadTask, events: &EventSender, outcome: Result<TaskOutput, TaskFailure>) {
    let task_id = task.id();
    let (state, event) = match outcome {
        Ok(output) => {
            info!(task_id, path = %output.file_path.display(), "task succeeded");
            (
                TaskState::Succeeded,
                TaskEvent::Succeeded {
                    task_id,
                    title: output.title,
                    attribution: output.attribution,
                    file_path: output.file_path,
                    bytes_written: output.bytes_written,
                },
            )
        }
        Err(TaskFailure::Cancelled) => {
            info!(task_id, "task cancelled");
            (TaskState::Cancelled, TaskEvent::Cancelled { task_id })
        }
        Err(failure) => {
            let kind = failure.kind().unwrap_or(FailureKind::Internal);
            warn!(task_id, ?kind, error = %failure, "task failed");
            (
                TaskState::Failed,
                TaskEvent::Failed {
                    task_id,
                    kind,
                    reason: failure.to_string(),
                },
            )
        }
    };

    if task.transition(state) {
        let _ = events.send(event);
    }
}
