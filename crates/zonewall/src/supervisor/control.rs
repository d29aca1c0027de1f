// ABOUTME: Fire-and-forget control channel to a zone's player socket.
// ABOUTME: One JSON command line per connection; replies are never read.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use zonewall_core::{ZoneError, ZoneId};

/// Control socket path for a zone: "{base}-zone{id}".
pub fn socket_path(base: &str, zone: ZoneId) -> PathBuf {
    PathBuf::from(format!("{}-zone{}", base, zone))
}

/// A player command as a token list, sent as `{"command": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlCommand {
    command: Vec<String>,
}

impl ControlCommand {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn toggle_pause() -> Self {
        Self::new(["cycle", "pause"])
    }

    /// Relative seek; the player clamps out-of-range targets itself.
    pub fn seek(delta_seconds: f64) -> Self {
        Self::new(["seek".to_string(), delta_seconds.to_string()])
    }

    pub fn set_volume(volume: u8) -> Self {
        Self::new(["set".to_string(), "volume".to_string(), volume.to_string()])
    }

    pub fn tokens(&self) -> &[String] {
        &self.command
    }

    /// Newline-terminated wire form.
    pub fn encode(&self) -> Result<String, ZoneError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Sends single commands to one zone's control socket.
#[derive(Debug, Clone)]
pub struct ControlClient {
    path: PathBuf,
    timeout: Duration,
}

impl ControlClient {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    /// Connect, write one line, close. The timeout covers connect and write together.
    pub async fn send(&self, command: &ControlCommand) -> Result<(), ZoneError> {
        if !self.path.exists() {
            return Err(ZoneError::control_unavailable(
                &self.path,
                "socket not found",
            ));
        }

        let line = command.encode()?;
        let exchange = async {
            let mut stream = UnixStream::connect(&self.path).await?;
            stream.write_all(line.as_bytes()).await?;
            stream.shutdown().await?;
            Ok::<_, std::io::Error>(())
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ZoneError::control_unavailable(&self.path, e.to_string())),
            Err(_) => Err(ZoneError::control_unavailable(
                &self.path,
                format!("timed out after {}ms", self.timeout.as_millis()),
            )),
        }
    }
}
