// ABOUTME: Zone identity, per-zone playback configuration, and display resolution.
// ABOUTME: ZoneId is the only place the fixed {1, 2} zone set is enforced.

use crate::error::ZoneError;
use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_VOLUME: u8 = 0;
pub const MAX_VOLUME: u8 = 100;
pub const DEFAULT_VOLUME: u8 = 50;

/// One of the two zones. There is never a third.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ZoneId {
    One,
    Two,
}

impl ZoneId {
    pub fn number(self) -> u8 {
        match self {
            ZoneId::One => 1,
            ZoneId::Two => 2,
        }
    }
}

impl TryFrom<u8> for ZoneId {
    type Error = ZoneError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ZoneId::One),
            2 => Ok(ZoneId::Two),
            other => Err(ZoneError::InvalidZoneId(i64::from(other))),
        }
    }
}

impl From<ZoneId> for u8 {
    fn from(zone: ZoneId) -> Self {
        zone.number()
    }
}

impl FromStr for ZoneId {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: u8 = s
            .trim()
            .parse()
            .map_err(|_| ZoneError::InvalidRequest(format!("zone must be 1 or 2, got '{s}'")))?;
        ZoneId::try_from(number)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Clamp any requested volume into the player's 0..=100 range.
pub fn clamp_volume(value: i64) -> u8 {
    value.clamp(MIN_VOLUME as i64, MAX_VOLUME as i64) as u8
}

/// Desired playback configuration for a zone, kept across start/stop cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub geometry: Geometry,
    pub volume: u8,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            volume: DEFAULT_VOLUME,
            loop_playback: true,
        }
    }
}

impl ZoneConfig {
    /// Same config with the volume forced into range.
    pub fn normalized(mut self) -> Self {
        self.volume = self.volume.min(MAX_VOLUME);
        self
    }
}

/// Resolution of the attached display. Informational only; never used to clamp geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayResolution {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayResolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Observable lifecycle state of a zone.
///
/// `Starting` covers the window inside `start` (including the restart done by a
/// geometry update on a live zone). Callers hold the zone lock for that whole
/// window, so it shows up in logs but never in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneState {
    Stopped,
    Starting,
    Running,
    Paused,
}

impl ZoneState {
    pub fn from_flags(running: bool, paused: bool) -> Self {
        match (running, paused) {
            (false, _) => ZoneState::Stopped,
            (true, false) => ZoneState::Running,
            (true, true) => ZoneState::Paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_id_accepts_only_one_and_two() {
        assert_eq!(ZoneId::try_from(1).unwrap(), ZoneId::One);
        assert_eq!(ZoneId::try_from(2).unwrap(), ZoneId::Two);
        assert!(matches!(
            ZoneId::try_from(0),
            Err(ZoneError::InvalidZoneId(0))
        ));
        assert!(matches!(
            ZoneId::try_from(3),
            Err(ZoneError::InvalidZoneId(3))
        ));
    }

    #[test]
    fn test_zone_id_parse_and_serde() {
        assert_eq!("2".parse::<ZoneId>().unwrap(), ZoneId::Two);
        assert!("two".parse::<ZoneId>().is_err());
        assert!("7".parse::<ZoneId>().is_err());

        assert_eq!(serde_json::to_string(&ZoneId::One).unwrap(), "1");
        assert_eq!(serde_json::from_str::<ZoneId>("2").unwrap(), ZoneId::Two);
        assert!(serde_json::from_str::<ZoneId>("5").is_err());
    }

    #[test]
    fn test_clamp_volume() {
        assert_eq!(clamp_volume(150), 100);
        assert_eq!(clamp_volume(-20), 0);
        assert_eq!(clamp_volume(75), 75);
        assert_eq!(clamp_volume(i64::MAX), 100);
    }

    #[test]
    fn test_zone_config_defaults() {
        let config = ZoneConfig::default();
        assert_eq!(config.geometry.x, 0);
        assert_eq!(config.geometry.y, 0);
        assert_eq!(config.volume, 50);
        assert!(config.loop_playback);
    }

    #[test]
    fn test_zone_config_serializes_loop_key() {
        let json = serde_json::to_value(ZoneConfig::default()).unwrap();
        assert_eq!(json["loop"], true);
        assert_eq!(json["volume"], 50);
    }

    #[test]
    fn test_zone_state_from_flags() {
        assert_eq!(ZoneState::from_flags(false, true), ZoneState::Stopped);
        assert_eq!(ZoneState::from_flags(true, false), ZoneState::Running);
        assert_eq!(ZoneState::from_flags(true, true), ZoneState::Paused);
    }
}
