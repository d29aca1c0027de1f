// ABOUTME: Client side of the control API used by the CLI subcommands.
// ABOUTME: Sends one request line and waits for the matching response line.

use super::{Request, Response};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

/// Geometry restarts stop and relaunch players, so replies can take a few seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    path: PathBuf,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn send(&self, request: &Request) -> Result<Response> {
        tokio::time::timeout(self.timeout, self.exchange(request))
            .await
            .with_context(|| {
                format!(
                    "No response from {} within {}s",
                    self.path.display(),
                    self.timeout.as_secs()
                )
            })?
    }

    async fn exchange(&self, request: &Request) -> Result<Response> {
        let stream = UnixStream::connect(&self.path).await.with_context(|| {
            format!(
                "Failed to connect to {} (is `zonewall serve` running?)",
                self.path.display()
            )
        })?;
        let (reader, mut writer) = stream.into_split();

        let request_json = serde_json::to_string(request)? + "\n";
        writer.write_all(request_json.as_bytes()).await?;

        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            bail!("Connection closed before a response was received");
        }

        let response: Response =
            serde_json::from_str(&line).context("Failed to parse API response")?;
        Ok(response)
    }
}
