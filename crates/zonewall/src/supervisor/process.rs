// ABOUTME: Player process abstraction and the mpv-backed launcher.
// ABOUTME: Spawns the player, polls liveness, and terminates with SIGTERM then SIGKILL.

use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::task::JoinHandle;
use zonewall_core::{ZoneConfig, ZoneError, ZoneId};

/// Flags passed to every player regardless of zone configuration.
pub const BASELINE_FLAGS: &[&str] = &[
    "--no-border",
    "--no-osc",
    "--no-osd-bar",
    "--really-quiet",
    "--keep-open=yes",
    "--vo=gpu",
    "--gpu-context=x11egl",
    "--autofit-larger=100%x100%",
    "--force-window=yes",
    "--idle=yes",
    "--ontop=yes",
    "--cursor-autohide=always",
    "--keepaspect=no",
    "--video-aspect-override=-1",
    "--panscan=1.0",
    "--hwdec=auto",
    "--cache=yes",
    "--demuxer-max-bytes=50M",
    "--demuxer-max-back-bytes=25M",
    "--network-timeout=10",
    "--rtsp-transport=tcp",
];

const STDERR_TAIL_LINES: usize = 40;
const STDERR_LINE_MAX_CHARS: usize = 512;
const STDERR_READ_RETRIES: usize = 8;
const DIAGNOSTICS_WAIT: Duration = Duration::from_millis(500);

/// Everything a launcher needs to start one zone's player.
#[derive(Debug, Clone, Copy)]
pub struct LaunchSpec<'a> {
    pub zone: ZoneId,
    pub config: &'a ZoneConfig,
    pub socket_path: &'a Path,
    pub source: &'a str,
}

/// How a player ended up terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Already gone before any signal was sent
    AlreadyExited,
    /// Exited within the grace period after SIGTERM
    Graceful,
    /// Needed SIGKILL
    Forced,
}

/// A running player owned by exactly one supervisor.
#[async_trait]
pub trait PlayerProcess: Send {
    fn pid(&self) -> Option<u32>;

    /// Non-blocking poll. Reaps the process when it has exited.
    fn is_alive(&mut self) -> bool;

    /// Captured stderr tail, for reporting why a player died.
    async fn diagnostics(&mut self) -> String;

    /// SIGTERM, wait up to `grace`, then SIGKILL and reap. Always finishes.
    async fn terminate(&mut self, grace: Duration) -> Termination;
}

pub trait PlayerLauncher: Send + Sync {
    fn spawn(&self, spec: &LaunchSpec<'_>) -> Result<Box<dyn PlayerProcess>, ZoneError>;
}

/// Full argument list for a player: baseline, derived, extra, then the source last.
pub fn player_args(
    config: &ZoneConfig,
    socket_path: &Path,
    extra_args: &[String],
    source: &str,
) -> Vec<String> {
    let mut args: Vec<String> = BASELINE_FLAGS.iter().map(|f| f.to_string()).collect();
    args.push(format!("--geometry={}", config.geometry));
    args.push(format!("--input-ipc-server={}", socket_path.display()));
    args.push(format!("--volume={}", config.volume));
    args.push(
        if config.loop_playback {
            "--loop-playlist=inf"
        } else {
            "--loop-playlist=no"
        }
        .to_string(),
    );
    args.extend(extra_args.iter().cloned());
    args.push(source.to_string());
    args
}

/// Launches the system mpv (or a compatible binary).
#[derive(Debug, Clone)]
pub struct MpvLauncher {
    binary: PathBuf,
    extra_args: Vec<String>,
}

impl MpvLauncher {
    pub fn new(binary: impl Into<PathBuf>, extra_args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            extra_args,
        }
    }
}

impl PlayerLauncher for MpvLauncher {
    fn spawn(&self, spec: &LaunchSpec<'_>) -> Result<Box<dyn PlayerProcess>, ZoneError> {
        let args = player_args(spec.config, spec.socket_path, &self.extra_args, spec.source);
        tracing::debug!(zone = %spec.zone, binary = %self.binary.display(), args = ?args, "Spawning player");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ZoneError::spawn_failure(
                    spec.zone,
                    format!("failed to launch {}: {}", self.binary.display(), e),
                )
            })?;

        let stderr_tail = child
            .stderr
            .take()
            .map(|stderr| tokio::spawn(drain_stderr(spec.zone, stderr)));

        Ok(Box::new(MpvProcess {
            zone: spec.zone,
            child,
            stderr_tail,
        }))
    }
}

/// Keep the last few stderr lines; the pipe must be drained for the player to keep running.
async fn drain_stderr(zone: ZoneId, stderr: ChildStderr) -> String {
    let mut reader = BufReader::new(stderr);
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    let mut raw = Vec::new();
    let mut failures = 0;

    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw).await {
            Ok(0) => break,
            Ok(_) => {
                failures = 0;
                let line = stderr_line(&raw);
                if line.is_empty() {
                    continue;
                }
                tracing::debug!(zone = %zone, stderr = %line, "Player stderr");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(zone = %zone, error = %e, "Failed reading player stderr");
                if failures >= STDERR_READ_RETRIES {
                    break;
                }
            }
        }
    }

    Vec::from(tail).join("\n")
}

/// Players print non-UTF-8 bytes (file names, codec junk); decode lossily and bound the length.
fn stderr_line(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches(['\r', '\n']);
    if text.chars().count() > STDERR_LINE_MAX_CHARS {
        text.chars().take(STDERR_LINE_MAX_CHARS).collect()
    } else {
        text.to_string()
    }
}

pub struct MpvProcess {
    zone: ZoneId,
    child: Child,
    stderr_tail: Option<JoinHandle<String>>,
}

#[async_trait]
impl PlayerProcess for MpvProcess {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    fn is_alive(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                tracing::debug!(zone = %self.zone, status = %status, "Player has exited");
                false
            }
            Err(e) => {
                tracing::warn!(zone = %self.zone, error = %e, "Failed to poll player");
                false
            }
        }
    }

    async fn diagnostics(&mut self) -> String {
        let Some(handle) = self.stderr_tail.take() else {
            return String::new();
        };
        match tokio::time::timeout(DIAGNOSTICS_WAIT, handle).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(zone = %self.zone, error = %e, "Stderr drain task failed");
                String::new()
            }
            // Something else still holds the pipe open
            Err(_) => String::new(),
        }
    }

    async fn terminate(&mut self, grace: Duration) -> Termination {
        if !self.is_alive() {
            return Termination::AlreadyExited;
        }

        if let Some(pid) = self.child.id() {
            if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                tracing::warn!(zone = %self.zone, pid, error = %e, "Failed to send SIGTERM");
            }
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(zone = %self.zone, status = %status, "Player exited after SIGTERM");
                return Termination::Graceful;
            }
            Ok(Err(e)) => {
                tracing::warn!(zone = %self.zone, error = %e, "Failed waiting for player");
            }
            Err(_) => {
                tracing::warn!(
                    zone = %self.zone,
                    grace_ms = grace.as_millis() as u64,
                    "Player ignored SIGTERM"
                );
            }
        }

        // SIGKILL then reap
        if let Err(e) = self.child.kill().await {
            tracing::warn!(zone = %self.zone, error = %e, "Failed to kill player");
        }
        Termination::Forced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonewall_core::Geometry;

    #[test]
    fn test_player_args_derived_flags() {
        let config = ZoneConfig {
            geometry: Geometry::new(960, 0, 960, 1080),
            volume: 75,
            loop_playback: false,
        };
        let args = player_args(
            &config,
            Path::new("/tmp/mpvsocket-zone2"),
            &["--vo=drm".to_string()],
            "rtsp://camera.local/stream",
        );

        assert!(args.contains(&"--geometry=960x1080+960+0".to_string()));
        assert!(args.contains(&"--input-ipc-server=/tmp/mpvsocket-zone2".to_string()));
        assert!(args.contains(&"--volume=75".to_string()));
        assert!(args.contains(&"--loop-playlist=no".to_string()));
        assert!(args.contains(&"--hwdec=auto".to_string()));
        assert!(args.contains(&"--rtsp-transport=tcp".to_string()));

        // Extra args come after the generated ones, source is last
        let extra = args.iter().position(|a| a == "--vo=drm").unwrap();
        let volume = args.iter().position(|a| a == "--volume=75").unwrap();
        assert!(extra > volume);
        assert_eq!(args.last().unwrap(), "rtsp://camera.local/stream");
    }

    #[test]
    fn test_player_args_loop_forever() {
        let args = player_args(
            &ZoneConfig::default(),
            Path::new("/tmp/s"),
            &[],
            "/videos/a.mp4",
        );
        assert!(args.contains(&"--loop-playlist=inf".to_string()));
        assert_eq!(args.len(), BASELINE_FLAGS.len() + 5);
    }

    #[test]
    fn test_stderr_line_decodes_lossily() {
        assert_eq!(stderr_line(b"vo init failed\n"), "vo init failed");
        assert_eq!(stderr_line(b"crlf\r\n"), "crlf");
        assert_eq!(
            stderr_line(b"warn \xff\xfe garbage\n"),
            "warn \u{FFFD}\u{FFFD} garbage"
        );
    }

    #[test]
    fn test_stderr_line_is_bounded() {
        let long = vec![b'x'; STDERR_LINE_MAX_CHARS * 3];
        assert_eq!(stderr_line(&long).len(), STDERR_LINE_MAX_CHARS);
    }

    #[tokio::test]
    async fn test_spawn_missing_binary_is_spawn_failure() {
        let launcher = MpvLauncher::new("/nonexistent/zonewall-player", Vec::new());
        let config = ZoneConfig::default();
        let spec = LaunchSpec {
            zone: ZoneId::One,
            config: &config,
            socket_path: Path::new("/tmp/unused-zone1"),
            source: "a.mp4",
        };

        let err = match launcher.spawn(&spec) {
            Ok(_) => panic!("spawn should fail"),
            Err(e) => e,
        };
        assert!(matches!(err, ZoneError::SpawnFailure { zone: ZoneId::One, .. }));
        assert!(err.to_string().contains("failed to launch"));
    }
}
