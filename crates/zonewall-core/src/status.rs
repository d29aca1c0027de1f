// ABOUTME: Point-in-time status snapshots for zones and the whole wall.
// ABOUTME: Serialized field names match what dashboards and scripts already consume.

use crate::geometry::Geometry;
use crate::zone::{DisplayResolution, ZoneId, ZoneState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable copy of one zone's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub zone_id: ZoneId,
    pub state: ZoneState,
    pub running: bool,
    pub source: Option<String>,
    pub paused: bool,
    pub volume: u8,
    pub geometry: Geometry,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    pub socket_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Both zones plus the display they share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatus {
    pub zone1: ZoneSnapshot,
    pub zone2: ZoneSnapshot,
    pub display: DisplayResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonesActive {
    pub zone1: bool,
    pub zone2: bool,
}

/// Liveness summary for health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub zones_active: ZonesActive,
}

impl Health {
    pub fn healthy(zone1: bool, zone2: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            zones_active: ZonesActive { zone1, zone2 },
        }
    }
}
