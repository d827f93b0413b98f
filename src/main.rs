//! CLI entry point for picfetch.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use picfetch_core::{HttpClient, StartError, TaskCoordinator};
use tracing::{debug, info, warn};

mod app_config;
mod cli;
mod render;

use cli::Args;
use render::Renderer;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays clean for --json output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let file_config = app_config::load_default_file_config()?;
    let config = app_config::resolve_task_config(&args, file_config.as_ref())?;
    let timeouts = app_config::resolve_http_timeouts(&args)?;
    debug!(?config, ?timeouts, "configuration resolved");

    let input_text = read_input(&args)?;

    let client = HttpClient::with_timeouts(timeouts)?;
    let (coordinator, mut events) = TaskCoordinator::new(client, config)?;

    let task = match coordinator.start(&input_text) {
        Ok(task) => task,
        Err(StartError::InputRequired) => {
            eprintln!("error: no input provided");
            eprintln!("Example: echo '{{\"title\": \"Cat\", \"url\": \"https://example.com/cat.png\"}}' | picfetch");
            return Ok(ExitCode::FAILURE);
        }
        Err(error) => return Err(error.into()),
    };
    info!(task_id = task.id(), "picfetch started");

    let renderer = Renderer::new(args.json, args.quiet);
    let mut cancel_sent = false;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    warn!("event channel closed before a terminal event");
                    return Ok(ExitCode::FAILURE);
                };
                if let Some(code) = renderer.render(&event)? {
                    return Ok(code);
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(error) = signal {
                    warn!(%error, "failed to listen for Ctrl+C");
                    continue;
                }
                if cancel_sent {
                    warn!("second Ctrl+C, exiting without waiting for the task");
                    return Ok(ExitCode::from(render::EXIT_CANCELLED));
                }
                info!("cancellation requested");
                cancel_sent = true;
                coordinator.cancel();
            }
        }
    }
}

/// Reads the input text from the given file, or from piped stdin.
///
/// Invalid UTF-8 is replaced rather than rejected so extraction still sees the
/// readable parts. An interactive stdin with no file yields empty text, which
/// the coordinator rejects as missing input.
fn read_input(args: &Args) -> Result<String> {
    let bytes = if let Some(path) = args.input_file() {
        fs::read(path).with_context(|| format!("failed to read input file {}", path.display()))?
    } else if io::stdin().is_terminal() {
        debug!("stdin is a terminal and no input file was given");
        return Ok(String::new());
    } else {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    };
    Ok(decode_lossy(bytes))
}

fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            debug!(
                valid_up_to = error.utf8_error().valid_up_to(),
                "input is not valid UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(error.as_bytes()).into_owned()
        }
    }
}
