// ABOUTME: Maps control API requests onto coordinator operations.
// ABOUTME: Validates zone ids, sources and presets before anything touches a player.

use super::{Request, Response};
use crate::source::SourceResolver;
use crate::supervisor::{Coordinator, StartOptions};
use serde_json::json;
use std::sync::Arc;
use zonewall_core::{
    clamp_volume, find_preset, DisplayResolution, GeometryPatch, LayoutPreset, ZoneError, ZoneId,
};

pub struct ApiHandler {
    coordinator: Arc<Coordinator>,
    resolver: SourceResolver,
    presets: Vec<LayoutPreset>,
}

impl ApiHandler {
    pub fn new(
        coordinator: Arc<Coordinator>,
        resolver: SourceResolver,
        presets: Vec<LayoutPreset>,
    ) -> Self {
        Self {
            coordinator,
            resolver,
            presets,
        }
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub async fn handle(&self, request: Request) -> Response {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => Response::failure(e.to_string()),
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Response, ZoneError> {
        let response = match request {
            Request::Play {
                zone,
                source,
                geometry,
                volume,
                loop_playback,
            } => {
                let zone = zone_id(zone)?;
                let source = self.resolver.resolve(&source)?;
                let options = StartOptions {
                    geometry,
                    volume,
                    loop_playback,
                };
                if self.coordinator.start_zone(zone, &source, options).await {
                    let status = self.coordinator.zone_status(zone).await;
                    Response::ok(json!({
                        "zone_id": zone,
                        "source": source,
                        "status": status,
                    }))
                } else {
                    self.zone_failure(zone, "Failed to start playback").await
                }
            }
            Request::Stop { zone } => {
                let zone = zone_id(zone)?;
                self.coordinator.stop_zone(zone).await;
                Response::ok(json!({ "zone_id": zone }))
            }
            Request::StopAll => {
                self.coordinator.stop_all().await;
                Response::ok(json!({ "message": "All zones stopped" }))
            }
            Request::Pause { zone } => {
                let zone = zone_id(zone)?;
                let paused = self.coordinator.pause_zone(zone).await;
                Response::ok(json!({ "zone_id": zone, "paused": paused }))
            }
            Request::Seek { zone, seconds } => {
                let zone = zone_id(zone)?;
                if self.coordinator.seek_zone(zone, seconds).await {
                    Response::ok(json!({ "zone_id": zone, "seeked": seconds }))
                } else {
                    self.zone_failure(zone, "Failed to seek").await
                }
            }
            Request::Volume { zone, volume } => {
                let zone = zone_id(zone)?;
                if self.coordinator.set_zone_volume(zone, volume).await {
                    Response::ok(json!({ "zone_id": zone, "volume": clamp_volume(volume) }))
                } else {
                    self.zone_failure(zone, "Failed to set volume").await
                }
            }
            Request::Geometry { zone, geometry } => {
                let zone = zone_id(zone)?;
                if geometry.is_empty() {
                    return Err(ZoneError::InvalidRequest(
                        "No valid geometry parameters provided".to_string(),
                    ));
                }
                if self.coordinator.update_zone_geometry(zone, &geometry).await {
                    let status = self.coordinator.zone_status(zone).await;
                    Response::ok(json!({ "zone_id": zone, "geometry": status.geometry }))
                } else {
                    self.zone_failure(zone, "Failed to apply geometry").await
                }
            }
            Request::Status { zone: None } => {
                Response::with_data(&self.coordinator.all_status().await)
            }
            Request::Status { zone: Some(zone) } => {
                let zone = zone_id(zone)?;
                Response::with_data(&self.coordinator.zone_status(zone).await)
            }
            Request::Resolution => Response::with_data(&self.coordinator.display_resolution()),
            Request::SetResolution { width, height } => {
                if width == 0 || height == 0 {
                    return Err(ZoneError::InvalidRequest(
                        "Resolution width and height must be positive".to_string(),
                    ));
                }
                let resolution = DisplayResolution { width, height };
                self.coordinator.set_display_resolution(resolution);
                Response::ok(json!({ "resolution": resolution }))
            }
            Request::Presets => Response::ok(json!({ "presets": self.presets })),
            Request::ApplyPreset { name } => {
                let preset = find_preset(&self.presets, &name)
                    .ok_or_else(|| ZoneError::UnknownPreset(name.clone()))?;
                let (zone1, zone2) = self
                    .coordinator
                    .apply_layout(
                        &GeometryPatch::from(preset.zone1),
                        &GeometryPatch::from(preset.zone2),
                    )
                    .await;
                tracing::info!(preset = %preset.name, zone1, zone2, "Applied layout preset");

                let data = json!({
                    "preset": preset.name,
                    "geometry": preset,
                    "applied": { "zone1": zone1, "zone2": zone2 },
                });
                if zone1 && zone2 {
                    Response::ok(data)
                } else {
                    Response {
                        success: false,
                        error: Some(format!("Preset {} only partially applied", preset.name)),
                        data: Some(data),
                    }
                }
            }
            Request::Health => Response::with_data(&self.coordinator.health().await),
        };
        Ok(response)
    }

    /// Explain a false result: not running, the recorded reason, or the fallback.
    async fn zone_failure(&self, zone: ZoneId, fallback: &str) -> Response {
        let status = self.coordinator.zone_status(zone).await;
        let error = match (status.running, status.last_error) {
            (false, Some(reason)) => format!("{}: {}", fallback, reason),
            (false, None) => format!("{}: zone {} is not running", fallback, zone),
            (true, Some(reason)) => format!("{}: {}", fallback, reason),
            (true, None) => fallback.to_string(),
        };
        Response::failure(error)
    }
}

/// Wire zone ids are plain integers; anything that is not 1 or 2 is reported as such.
fn zone_id(raw: i64) -> Result<ZoneId, ZoneError> {
    u8::try_from(raw)
        .map_err(|_| ZoneError::InvalidZoneId(raw))
        .and_then(ZoneId::try_from)
}
