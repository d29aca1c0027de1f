// ABOUTME: Error types for zonewall supervision and its boundary layer.
// ABOUTME: Every variant renders a human-readable reason for status and API responses.

use crate::zone::ZoneId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised inside the supervision layer.
///
/// Supervisor operations never hand these to their callers directly; they are
/// logged, recorded as the zone's last error, and turned into boolean results.
#[derive(Error, Debug)]
pub enum ZoneError {
    /// The player could not be launched or exited during the liveness check.
    #[error("zone {zone} failed to start: {reason}")]
    SpawnFailure { zone: ZoneId, reason: String },

    /// The control socket is missing, refused the connection, or timed out.
    #[error("control channel {} unavailable: {reason}", .path.display())]
    ControlChannelUnavailable { path: PathBuf, reason: String },

    /// Graceful termination did not finish within the grace period.
    #[error("zone {zone} did not exit after SIGTERM")]
    TerminationTimeout { zone: ZoneId },

    /// A zone id outside {1, 2}.
    #[error("Invalid zone_id {0}. Must be 1 or 2")]
    InvalidZoneId(i64),

    /// A local source file that does not exist.
    #[error("File not found: {0}")]
    SourceNotFound(String),

    /// No built-in or configured layout preset with this name.
    #[error("Preset not found: {0}")]
    UnknownPreset(String),

    /// A malformed or incomplete request at the boundary.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ZoneError {
    pub fn spawn_failure(zone: ZoneId, reason: impl Into<String>) -> Self {
        Self::SpawnFailure {
            zone,
            reason: reason.into(),
        }
    }

    pub fn control_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ControlChannelUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
