// ABOUTME: Shared types and configuration for zonewall.
// ABOUTME: Contains config parsing, zone model, status snapshots, presets, and errors.

pub mod config;
pub mod error;
pub mod geometry;
pub mod presets;
pub mod status;
pub mod zone;

pub use config::{Config, Timing};
pub use error::ZoneError;
pub use geometry::{Geometry, GeometryPatch};
pub use presets::{builtin_presets, find_preset, merge_presets, LayoutPreset};
pub use status::{AggregateStatus, Health, ZoneSnapshot, ZonesActive};
pub use zone::{clamp_volume, DisplayResolution, ZoneConfig, ZoneId, ZoneState};
