//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use picfetch_core::{EventReceiver, TaskConfig, TaskEvent};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Upper bound for waiting on any single event.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fast task config writing into `output_dir`.
pub fn fast_config(output_dir: &std::path::Path) -> TaskConfig {
    TaskConfig {
        output_dir: output_dir.to_path_buf(),
        progress_pause: Duration::from_millis(1),
        ..TaskConfig::default()
    }
}

/// JSON-like input text with the given fields.
pub fn metadata_json(title: &str, copyright: &str, url: &str) -> String {
    format!(r#"{{"title": "{title}", "copyright": "{copyright}", "url": "{url}"}}"#)
}

/// Receives the next event, panicking if none arrives in time.
pub async fn next_event(events: &mut EventReceiver) -> TaskEvent {
    tokio::time::timeout(EVENT_TIMEOUT, events.recv())
        .await
        .expect("timed out waiting for task event")
        .expect("event channel closed")
}

/// Collects events up to and including the first terminal one.
pub async fn collect_until_terminal(events: &mut EventReceiver) -> Vec<TaskEvent> {
    let mut collected = Vec::new();
    loop {
        let event = next_event(events).await;
        let terminal = event.is_terminal();
        collected.push(event);
        if terminal {
            return collected;
        }
    }
}

/// A one-shot HTTP server that sends `head` of the body, then waits for the
/// release signal before sending `tail`.
pub struct StalledServer {
    /// Base URL, e.g. `http://127.0.0.1:4321`.
    pub uri: String,
    release: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl StalledServer {
    /// Starts serving a single request with a `Content-Length` of
    /// `head.len() + tail.len()`.
    pub async fn start(head: Vec<u8>, tail: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        let (release, released) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = [0_u8; 4096];
            let _ = socket.read(&mut request).await;

            let headers = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                head.len() + tail.len()
            );
            if socket.write_all(headers.as_bytes()).await.is_err() {
                return;
            }
            if socket.write_all(&head).await.is_err() {
                return;
            }
            let _ = socket.flush().await;

            let _ = released.await;
            let _ = socket.write_all(&tail).await;
            let _ = socket.flush().await;
        });

        Self {
            uri: format!("http://{addr}"),
            release: Some(release),
            handle,
        }
    }

    /// Lets the server send the rest of the body.
    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            let _ = release.send(());
        }
    }

    /// Releases the server and waits for it to finish.
    pub async fn shutdown(mut self) {
        self.release();
        let _ = self.handle.await;
    }
}
