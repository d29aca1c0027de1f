// ABOUTME: Line-delimited JSON control API served on a local unix socket.
// ABOUTME: Request and response types shared by the daemon and the CLI client.

pub mod client;
pub mod handler;
pub mod server;

pub use client::ApiClient;
pub use handler::ApiHandler;
pub use server::{bind_api_socket, serve_api};

use serde::{Deserialize, Serialize};
use zonewall_core::GeometryPatch;

/// One request per line. Zone ids stay raw so out-of-range values get a proper error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Play {
        zone: i64,
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        geometry: Option<GeometryPatch>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        volume: Option<i64>,
        #[serde(
            default,
            rename = "loop",
            skip_serializing_if = "Option::is_none"
        )]
        loop_playback: Option<bool>,
    },
    Stop {
        zone: i64,
    },
    StopAll,
    Pause {
        zone: i64,
    },
    Seek {
        zone: i64,
        seconds: f64,
    },
    Volume {
        zone: i64,
        volume: i64,
    },
    Geometry {
        zone: i64,
        geometry: GeometryPatch,
    },
    Status {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        zone: Option<i64>,
    },
    Resolution,
    SetResolution {
        width: u32,
        height: u32,
    },
    Presets,
    ApplyPreset {
        name: String,
    },
    Health,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Response {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }

    /// Serialize a typed payload; a payload that cannot be encoded becomes a failure.
    pub fn with_data<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self::ok(value),
            Err(e) => Self::failure(format!("Failed to encode response: {}", e)),
        }
    }
}
