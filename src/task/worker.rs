//! The background body of one task run: extract, pace progress, download.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::error::TaskFailure;
use super::event::{EventSender, TaskEvent};
use super::handle::DownloadTask;
use super::state::TaskState;
use crate::config::TaskConfig;
use crate::download::{HttpClient, TransferOptions, destination_path};
use crate::extract::{ATTRIBUTION, FieldPatterns, TITLE, URL, extract};

/// Everything a worker needs besides its task and input.
#[derive(Debug, Clone)]
pub(super) struct WorkerContext {
    pub(super) client: HttpClient,
    pub(super) config: Arc<TaskConfig>,
    pub(super) patterns: Arc<FieldPatterns>,
    pub(super) events: EventSender,
}

impl WorkerContext {
    fn emit(&self, event: TaskEvent) {
        // A dropped receiver only means nobody is listening.
        let _ = self.events.send(event);
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct TaskOutput {
    pub(super) title: String,
    pub(super) attribution: String,
    pub(super) file_path: PathBuf,
    pub(super) bytes_written: u64,
}

/// Runs all phases of `task`. Publishes every non-terminal event; the caller
/// publishes the terminal one.
#[instrument(skip_all, fields(task_id = task.id()))]
pub(super) async fn run(
    task: Arc<DownloadTask>,
    text: String,
    ctx: WorkerContext,
) -> Result<TaskOutput, TaskFailure> {
    let fields = extract(&text, &ctx.patterns);
    let title = fields.get_or(TITLE, &ctx.config.placeholder).to_string();
    let attribution = fields.get_or(ATTRIBUTION, &ctx.config.placeholder).to_string();
    let url = fields.get(URL).to_string();
    task.set_url(url.clone());
    debug!(%title, %attribution, %url, "fields extracted");

    task.transition(TaskState::Progressing);
    pace_progress(&task, &ctx).await?;

    if task.is_cancel_requested() {
        return Err(TaskFailure::Cancelled);
    }

    ctx.emit(TaskEvent::MetadataResolved {
        task_id: task.id(),
        title: title.clone(),
        attribution: attribution.clone(),
        url: url.clone(),
    });

    task.transition(TaskState::Downloading);
    if let Ok(path) = destination_path(&ctx.config.output_dir, &url) {
        task.set_destination(path);
    }

    let options = TransferOptions {
        chunk_size: ctx.config.chunk_size,
        cancel: task.cancel_token(),
    };
    let task_id = task.id();
    let download = ctx
        .client
        .download_to_file_with_progress(
            &url,
            &ctx.config.output_dir,
            options,
            |bytes_written, content_length| {
                ctx.emit(TaskEvent::BytesTransferred {
                    task_id,
                    bytes_written,
                    content_length,
                });
            },
        )
        .await
        .map_err(TaskFailure::from_download)?;

    info!(path = %download.path.display(), bytes = download.bytes_written, "image saved");

    Ok(TaskOutput {
        title,
        attribution,
        file_path: download.path,
        bytes_written: download.bytes_written,
    })
}

/// Reports each configured percent value after a pause, checking for
/// cancellation before every step.
async fn pace_progress(task: &DownloadTask, ctx: &WorkerContext) -> Result<(), TaskFailure> {
    for percent in ctx.config.progress_steps() {
        if task.is_cancel_requested() {
            debug!(percent, "cancellation observed during progress phase");
            return Err(TaskFailure::Cancelled);
        }
        tokio::select! {
            biased;
            () = task.cancel_token().cancelled() => {
                debug!(percent, "cancellation observed during progress pause");
                return Err(TaskFailure::Cancelled);
            }
            () = tokio::time::sleep(ctx.config.progress_pause) => {}
        }
        let percent = task.advance_progress(percent);
        ctx.emit(TaskEvent::ProgressUpdated {
            task_id: task.id(),
            percent,
        });
    }
    Ok(())
}
