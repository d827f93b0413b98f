//! Terminal rendering of task events.

use std::io::{self, Write};
use std::process::ExitCode;

use indicatif::{ProgressBar, ProgressStyle};
use picfetch_core::TaskEvent;
use tracing::debug;

/// Exit code when the run was cancelled (128 + SIGINT).
pub(crate) const EXIT_CANCELLED: u8 = 130;

/// How events are shown to the user.
pub(crate) enum Renderer {
    /// Progress bar on stderr and a summary on stdout.
    Bar(ProgressBar),
    /// One JSON object per event on stdout.
    Json,
    /// Nothing but errors.
    Quiet,
}

impl Renderer {
    pub(crate) fn new(json: bool, quiet: bool) -> Self {
        if json {
            return Self::Json;
        }
        if quiet {
            return Self::Quiet;
        }
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self::Bar(bar)
    }

    /// Shows `event`; returns the process exit code once the event is terminal.
    pub(crate) fn render(&self, event: &TaskEvent) -> io::Result<Option<ExitCode>> {
        debug!(?event, "task event");
        match self {
            Self::Json => {
                let line = serde_json::to_string(event).map_err(io::Error::other)?;
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{line}")?;
                stdout.flush()?;
                if let TaskEvent::Failed { reason, .. } = event {
                    eprintln!("error: {reason}");
                }
            }
            Self::Bar(bar) => render_bar(bar, event),
            Self::Quiet => {
                if let TaskEvent::Failed { reason, .. } = event {
                    eprintln!("error: {reason}");
                }
            }
        }
        Ok(exit_code_for(event))
    }
}

fn render_bar(bar: &ProgressBar, event: &TaskEvent) {
    match event {
        TaskEvent::Started { .. } => bar.set_message("reading metadata"),
        TaskEvent::ProgressUpdated { percent, .. } => bar.set_position(u64::from(*percent)),
        TaskEvent::MetadataResolved { title, .. } => bar.set_message(format!("fetching {title}")),
        TaskEvent::BytesTransferred {
            bytes_written,
            content_length,
            ..
        } => bar.set_message(match content_length {
            Some(total) => format!("{bytes_written}/{total} bytes"),
            None => format!("{bytes_written} bytes"),
        }),
        TaskEvent::Succeeded {
            title,
            attribution,
            file_path,
            bytes_written,
            ..
        } => {
            bar.finish_and_clear();
            println!("Title:  {title}");
            println!("Author: {attribution}");
            println!("Saved:  {} ({bytes_written} bytes)", file_path.display());
        }
        TaskEvent::Cancelled { .. } => bar.abandon_with_message("cancelled"),
        TaskEvent::Failed { reason, .. } => {
            bar.abandon();
            eprintln!("error: {reason}");
        }
    }
}

/// Maps a terminal event to the process exit code.
pub(crate) fn exit_code_for(event: &TaskEvent) -> Option<ExitCode> {
    match event {
        TaskEvent::Succeeded { .. } => Some(ExitCode::SUCCESS),
        TaskEvent::Cancelled { .. } => Some(ExitCode::from(EXIT_CANCELLED)),
        TaskEvent::Failed { .. } => Some(ExitCode::FAILURE),
        _ => None,
    }
}
