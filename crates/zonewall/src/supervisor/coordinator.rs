// ABOUTME: Coordinator for the two zone supervisors and the shared display resolution.
// ABOUTME: Each zone sits behind its own async mutex so both can be driven at once.

use super::process::PlayerLauncher;
use super::zone::{StartOptions, ZoneSupervisor};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use zonewall_core::{
    AggregateStatus, Config, DisplayResolution, GeometryPatch, Health, ZoneId, ZoneSnapshot,
};

pub struct Coordinator {
    zone1: Mutex<ZoneSupervisor>,
    zone2: Mutex<ZoneSupervisor>,
    display: RwLock<DisplayResolution>,
}

impl Coordinator {
    pub fn new(zone1: ZoneSupervisor, zone2: ZoneSupervisor, display: DisplayResolution) -> Self {
        Self {
            zone1: Mutex::new(zone1),
            zone2: Mutex::new(zone2),
            display: RwLock::new(display),
        }
    }

    /// Build both supervisors from the configured zone defaults.
    pub fn from_config(config: &Config, launcher: Arc<dyn PlayerLauncher>) -> Self {
        let socket_base = config.socket_base_expanded();
        let supervisor = |zone: ZoneId| {
            ZoneSupervisor::new(
                zone,
                config.zone_config(zone),
                &socket_base,
                launcher.clone(),
                config.timing,
            )
        };
        Self::new(
            supervisor(ZoneId::One),
            supervisor(ZoneId::Two),
            config.display,
        )
    }

    fn zone(&self, zone: ZoneId) -> &Mutex<ZoneSupervisor> {
        match zone {
            ZoneId::One => &self.zone1,
            ZoneId::Two => &self.zone2,
        }
    }

    pub async fn start_zone(&self, zone: ZoneId, source: &str, options: StartOptions) -> bool {
        self.zone(zone).lock().await.start(source, options).await
    }

    pub async fn stop_zone(&self, zone: ZoneId) {
        self.zone(zone).lock().await.stop().await;
    }

    /// Stops both zones concurrently.
    pub async fn stop_all(&self) {
        tokio::join!(self.stop_zone(ZoneId::One), self.stop_zone(ZoneId::Two));
        tracing::info!("All zones stopped");
    }

    pub async fn pause_zone(&self, zone: ZoneId) -> bool {
        self.zone(zone).lock().await.pause().await
    }

    pub async fn seek_zone(&self, zone: ZoneId, delta_seconds: f64) -> bool {
        self.zone(zone).lock().await.seek(delta_seconds).await
    }

    pub async fn set_zone_volume(&self, zone: ZoneId, value: i64) -> bool {
        self.zone(zone).lock().await.set_volume(value).await
    }

    pub async fn update_zone_geometry(&self, zone: ZoneId, patch: &GeometryPatch) -> bool {
        self.zone(zone).lock().await.update_geometry(patch).await
    }

    /// Apply a layout to both zones at once; each result is reported separately.
    pub async fn apply_layout(&self, zone1: &GeometryPatch, zone2: &GeometryPatch) -> (bool, bool) {
        tokio::join!(
            self.update_zone_geometry(ZoneId::One, zone1),
            self.update_zone_geometry(ZoneId::Two, zone2)
        )
    }

    pub async fn zone_status(&self, zone: ZoneId) -> ZoneSnapshot {
        self.zone(zone).lock().await.status()
    }

    pub async fn is_zone_running(&self, zone: ZoneId) -> bool {
        self.zone(zone).lock().await.is_running()
    }

    pub async fn all_status(&self) -> AggregateStatus {
        let (zone1, zone2) = tokio::join!(
            self.zone_status(ZoneId::One),
            self.zone_status(ZoneId::Two)
        );
        AggregateStatus {
            zone1,
            zone2,
            display: self.display_resolution(),
        }
    }

    pub async fn health(&self) -> Health {
        let (zone1, zone2) = tokio::join!(
            self.is_zone_running(ZoneId::One),
            self.is_zone_running(ZoneId::Two)
        );
        Health::healthy(zone1, zone2)
    }

    pub fn display_resolution(&self) -> DisplayResolution {
        *self.display.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Informational only; zone geometry is never checked against it.
    pub fn set_display_resolution(&self, resolution: DisplayResolution) {
        *self.display.write().unwrap_or_else(PoisonError::into_inner) = resolution;
        tracing::info!(
            width = resolution.width,
            height = resolution.height,
            "Display resolution updated"
        );
    }
}
