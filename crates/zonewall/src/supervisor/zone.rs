// ABOUTME: Supervisor for one zone's player process and control socket.
// ABOUTME: Owns the process handle, desired config, and the restart-on-geometry policy.

use super::control::{socket_path, ControlClient, ControlCommand};
use super::process::{LaunchSpec, PlayerLauncher, PlayerProcess, Termination};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zonewall_core::{
    clamp_volume, GeometryPatch, Timing, ZoneConfig, ZoneError, ZoneId, ZoneSnapshot, ZoneState,
};

/// Optional overrides merged into the zone config by `start`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StartOptions {
    pub geometry: Option<GeometryPatch>,
    pub volume: Option<i64>,
    pub loop_playback: Option<bool>,
}

impl StartOptions {
    pub fn with_geometry(geometry: GeometryPatch) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }
}

/// Owns at most one player process for a zone.
///
/// Every public operation reports success as a plain value. Failures are
/// logged and kept as the zone's `last_error` instead of being returned.
pub struct ZoneSupervisor {
    zone: ZoneId,
    config: ZoneConfig,
    socket_path: PathBuf,
    control: ControlClient,
    launcher: Arc<dyn PlayerLauncher>,
    timing: Timing,
    process: Option<Box<dyn PlayerProcess>>,
    current_source: Option<String>,
    paused: bool,
    started_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl ZoneSupervisor {
    pub fn new(
        zone: ZoneId,
        config: ZoneConfig,
        socket_base: &str,
        launcher: Arc<dyn PlayerLauncher>,
        timing: Timing,
    ) -> Self {
        let socket_path = socket_path(socket_base, zone);
        let control = ControlClient::new(&socket_path, timing.control_timeout());
        Self {
            zone,
            config: config.normalized(),
            socket_path,
            control,
            launcher,
            timing,
            process: None,
            current_source: None,
            paused: false,
            started_at: None,
            last_error: None,
        }
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Stop whatever is running, merge overrides, spawn, and verify the player survived startup.
    pub async fn start(&mut self, source: &str, options: StartOptions) -> bool {
        match self.try_start(source, options).await {
            Ok(pid) => {
                tracing::info!(
                    zone = %self.zone,
                    pid = ?pid,
                    source = %source,
                    geometry = %self.config.geometry,
                    "Player started"
                );
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::error!(zone = %self.zone, error = %e, "Player failed to start");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    async fn try_start(
        &mut self,
        source: &str,
        options: StartOptions,
    ) -> Result<Option<u32>, ZoneError> {
        self.stop().await;
        self.apply_options(&options);

        tracing::debug!(
            zone = %self.zone,
            state = ?ZoneState::Starting,
            source = %source,
            geometry = %self.config.geometry,
            volume = self.config.volume,
            "Launching player"
        );

        let spec = LaunchSpec {
            zone: self.zone,
            config: &self.config,
            socket_path: &self.socket_path,
            source,
        };
        let mut process = self.launcher.spawn(&spec)?;

        tokio::time::sleep(self.timing.startup_check()).await;
        if !process.is_alive() {
            let diagnostics = process.diagnostics().await;
            self.remove_socket_file();
            let reason = match diagnostics.trim() {
                "" => "player exited during startup".to_string(),
                text => format!("player exited during startup: {}", text),
            };
            return Err(ZoneError::spawn_failure(self.zone, reason));
        }

        let pid = process.pid();
        self.process = Some(process);
        self.current_source = Some(source.to_string());
        self.paused = false;
        self.started_at = Some(Utc::now());
        Ok(pid)
    }

    fn apply_options(&mut self, options: &StartOptions) {
        if let Some(geometry) = &options.geometry {
            self.config.geometry.merge(geometry);
        }
        if let Some(volume) = options.volume {
            self.config.volume = clamp_volume(volume);
        }
        if let Some(loop_playback) = options.loop_playback {
            self.config.loop_playback = loop_playback;
        }
    }

    /// Terminate the player (SIGTERM, then SIGKILL after the grace period) and clear runtime state.
    pub async fn stop(&mut self) {
        if let Some(mut process) = self.process.take() {
            tracing::info!(zone = %self.zone, pid = ?process.pid(), "Stopping player");
            match process.terminate(self.timing.stop_grace()).await {
                Termination::Forced => {
                    let e = ZoneError::TerminationTimeout { zone: self.zone };
                    tracing::warn!(zone = %self.zone, error = %e, "Player force-killed");
                }
                Termination::Graceful => {
                    tracing::debug!(zone = %self.zone, "Player stopped");
                }
                Termination::AlreadyExited => {
                    tracing::debug!(zone = %self.zone, "Player had already exited");
                }
            }
        }
        self.clear_runtime();
    }

    /// Toggle pause. Returns the new local paused flag, or false when nothing is running.
    pub async fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.dispatch(ControlCommand::toggle_pause()).await;
        // Optimistic: not confirmed against the player
        self.paused = !self.paused;
        self.paused
    }

    /// Relative seek. True when the command was delivered to the socket.
    pub async fn seek(&mut self, delta_seconds: f64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.dispatch(ControlCommand::seek(delta_seconds)).await
    }

    /// Clamp, store, then send. The stored volume stays even if delivery fails.
    pub async fn set_volume(&mut self, value: i64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.config.volume = clamp_volume(value);
        self.dispatch(ControlCommand::set_volume(self.config.volume))
            .await
    }

    /// Merge a geometry change. A live player cannot be resized, so a running
    /// zone is restarted on the same source with the merged geometry.
    pub async fn update_geometry(&mut self, patch: &GeometryPatch) -> bool {
        if !self.is_running() {
            self.config.geometry.merge(patch);
            tracing::debug!(zone = %self.zone, geometry = %self.config.geometry, "Geometry stored for next start");
            return true;
        }

        let Some(source) = self.current_source.clone() else {
            return false;
        };
        self.config.geometry.merge(patch);
        tracing::info!(zone = %self.zone, geometry = %self.config.geometry, "Restarting player for new geometry");
        self.start(&source, StartOptions::default()).await
    }

    pub fn set_loop(&mut self, loop_playback: bool) {
        self.config.loop_playback = loop_playback;
    }

    /// Polls the process. An observed exit collapses the zone to stopped.
    pub fn is_running(&mut self) -> bool {
        let alive = match self.process.as_mut() {
            Some(process) => process.is_alive(),
            None => return false,
        };
        if !alive {
            tracing::warn!(zone = %self.zone, source = ?self.current_source, "Player exited unexpectedly");
            self.process = None;
            self.clear_runtime();
            self.last_error = Some("player exited unexpectedly".to_string());
        }
        alive
    }

    pub fn state(&mut self) -> ZoneState {
        let running = self.is_running();
        ZoneState::from_flags(running, self.paused)
    }

    pub fn status(&mut self) -> ZoneSnapshot {
        let running = self.is_running();
        ZoneSnapshot {
            zone_id: self.zone,
            state: ZoneState::from_flags(running, self.paused),
            running,
            source: self.current_source.clone(),
            paused: self.paused,
            volume: self.config.volume,
            geometry: self.config.geometry,
            loop_playback: self.config.loop_playback,
            socket_path: self.socket_path.clone(),
            pid: self.process.as_ref().and_then(|p| p.pid()),
            started_at: self.started_at,
            last_error: self.last_error.clone(),
        }
    }

    async fn dispatch(&mut self, command: ControlCommand) -> bool {
        match self.control.send(&command).await {
            Ok(()) => {
                tracing::debug!(zone = %self.zone, command = ?command.tokens(), "Sent control command");
                true
            }
            Err(e) => {
                tracing::warn!(zone = %self.zone, command = ?command.tokens(), error = %e, "Control command failed");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    fn clear_runtime(&mut self) {
        self.remove_socket_file();
        self.current_source = None;
        self.paused = false;
        self.started_at = None;
    }

    /// A dead player can leave its socket behind; remove it whatever path got us here.
    fn remove_socket_file(&self) {
        match std::fs::remove_file(&self.socket_path) {
            Ok(()) => {
                tracing::debug!(zone = %self.zone, socket = %self.socket_path.display(), "Removed control socket");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(zone = %self.zone, socket = %self.socket_path.display(), error = %e, "Failed to remove control socket");
            }
        }
    }
}

impl Drop for ZoneSupervisor {
    fn drop(&mut self) {
        // The process handle kills the player on drop; only the socket file needs cleanup.
        if self.process.is_some() {
            self.remove_socket_file();
        }
    }
}
