// ABOUTME: Configuration for the zonewall daemon and CLI.
// ABOUTME: Loaded from a TOML file where every field has a working default.

use crate::presets::LayoutPreset;
use crate::zone::{DisplayResolution, ZoneConfig, ZoneId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Player binary, resolved through PATH when not absolute
    pub player_binary: String,

    /// Control sockets live at "{socket_base}-zone{id}"
    pub socket_base: String,

    /// Unix socket the daemon's control API listens on
    pub api_socket: String,

    /// Directory relative source paths are resolved against
    pub media_dir: String,

    /// Extra player flags appended after the generated ones
    pub extra_args: Vec<String>,

    pub timing: Timing,

    pub display: DisplayResolution,

    pub zone1: ZoneConfig,

    pub zone2: ZoneConfig,

    /// Additional layouts; a name matching a built-in replaces it
    pub presets: Vec<LayoutPreset>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_binary: "mpv".to_string(),
            socket_base: "/tmp/mpvsocket".to_string(),
            api_socket: "/tmp/zonewall.sock".to_string(),
            media_dir: "/opt/rpi-video-player/data/videos".to_string(),
            extra_args: Vec::new(),
            timing: Timing::default(),
            display: DisplayResolution::default(),
            zone1: ZoneConfig::default(),
            zone2: ZoneConfig::default(),
            presets: Vec::new(),
        }
    }
}

/// Fixed delays and timeouts used by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Delay between spawning the player and polling it for an early exit
    pub startup_check_ms: u64,
    /// How long a SIGTERM'd player gets before SIGKILL
    pub stop_grace_ms: u64,
    /// Connect plus write budget for one control command
    pub control_timeout_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            startup_check_ms: 300,
            stop_grace_ms: 2000,
            control_timeout_ms: 1000,
        }
    }
}

impl Timing {
    pub fn startup_check(&self) -> Duration {
        Duration::from_millis(self.startup_check_ms)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }

    pub fn control_timeout(&self) -> Duration {
        Duration::from_millis(self.control_timeout_ms)
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load config from a TOML file, or fall back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the default config file path (~/.config/zonewall/zonewall.toml)
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .context("Could not determine home directory")
            })?
            .join("zonewall");
        Ok(config_dir.join("zonewall.toml"))
    }

    /// Starting configuration for a zone, with the volume clamped into range
    pub fn zone_config(&self, zone: ZoneId) -> ZoneConfig {
        match zone {
            ZoneId::One => self.zone1,
            ZoneId::Two => self.zone2,
        }
        .normalized()
    }

    pub fn socket_base_expanded(&self) -> String {
        shellexpand::tilde(&self.socket_base).into_owned()
    }

    pub fn api_socket_expanded(&self) -> PathBuf {
        shellexpand::tilde(&self.api_socket).into_owned().into()
    }

    pub fn media_dir_expanded(&self) -> PathBuf {
        shellexpand::tilde(&self.media_dir).into_owned().into()
    }

    pub fn player_binary_expanded(&self) -> PathBuf {
        shellexpand::tilde(&self.player_binary).into_owned().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            player_binary = "/usr/local/bin/mpv"
            socket_base = "/run/zonewall/mpv"
            extra_args = ["--vo=drm"]

            [timing]
            stop_grace_ms = 500

            [display]
            width = 3840
            height = 2160

            [zone2]
            geometry = {{ x = 960, y = 0, width = 960, height = 1080 }}
            volume = 80
            loop = false
        "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.player_binary, "/usr/local/bin/mpv");
        assert_eq!(config.socket_base, "/run/zonewall/mpv");
        assert_eq!(config.extra_args, vec!["--vo=drm".to_string()]);
        assert_eq!(config.timing.stop_grace_ms, 500);
        // Unset timing fields keep their defaults
        assert_eq!(config.timing.startup_check_ms, 300);
        assert_eq!(config.display.width, 3840);

        let zone2 = config.zone_config(ZoneId::Two);
        assert_eq!(zone2.geometry, Geometry::new(960, 0, 960, 1080));
        assert_eq!(zone2.volume, 80);
        assert!(!zone2.loop_playback);
        assert_eq!(config.zone_config(ZoneId::One), ZoneConfig::default());
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let file = NamedTempFile::new().unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timing.control_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_out_of_range_volume_is_clamped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[zone1]\nvolume = 180").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.zone_config(ZoneId::One).volume, 100);
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("zonewall.toml");

        let config = Config {
            media_dir: "/srv/videos".to_string(),
            presets: vec![LayoutPreset {
                name: "lobby".to_string(),
                description: "Lobby wall".to_string(),
                zone1: Geometry::new(0, 0, 1280, 720),
                zone2: Geometry::new(1280, 0, 640, 720),
            }],
            ..Config::default()
        };

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.player_binary, "mpv");
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "player_binary = [").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{err}").contains("Failed to parse config"));
    }

    #[test]
    fn test_path_expansion() {
        let config = Config {
            media_dir: "~/videos".to_string(),
            ..Config::default()
        };
        let expanded = config.media_dir_expanded();
        assert!(!expanded.to_string_lossy().contains('~'));
    }
}
