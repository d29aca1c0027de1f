// ABOUTME: Unix socket server for the control API.
// ABOUTME: One task per connection, one JSON response line per request line.

use super::{ApiHandler, Request, Response};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Bind the API socket, replacing a stale one left by an earlier run.
pub fn bind_api_socket(path: &Path) -> Result<UnixListener> {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed stale API socket"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to remove stale socket {}", path.display()))
        }
    }
    let listener = UnixListener::bind(path)
        .with_context(|| format!("Failed to bind API socket {}", path.display()))?;
    tracing::info!(path = %path.display(), "API socket listening");
    Ok(listener)
}

/// Accept connections forever.
pub async fn serve_api(listener: UnixListener, handler: Arc<ApiHandler>) -> Result<()> {
    loop {
        let (stream, _) = listener.accept().await?;
        let handler = handler.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, handler).await {
                tracing::warn!(error = %e, "API connection error");
            }
        });
    }
}

async fn handle_connection(stream: UnixStream, handler: Arc<ApiHandler>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    while reader.read_line(&mut line).await? > 0 {
        if line.trim().is_empty() {
            line.clear();
            continue;
        }
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                tracing::debug!(request = ?request, "API request");
                handler.handle(request).await
            }
            Err(e) => Response::failure(format!("Malformed request: {}", e)),
        };
        let response_json = serde_json::to_string(&response)? + "\n";
        writer.write_all(response_json.as_bytes()).await?;
        line.clear();
    }

    Ok(())
}
