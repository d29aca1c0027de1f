// ABOUTME: Shared helpers for zonewall integration tests.
// ABOUTME: Writes throwaway shell scripts that stand in for the player binary.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zonewall::{MpvLauncher, ZoneSupervisor};
use zonewall_core::{Timing, ZoneConfig, ZoneId};

/// Runs until signalled.
pub const LONG_RUNNING: &str = "exec sleep 30";

/// Dies during the liveness check with a message on stderr.
pub const FAILS_AT_STARTUP: &str = "echo \"boom: cannot open display\" >&2\nexit 1";

/// Writes bytes that are not UTF-8 to stderr, then fails with a readable message.
pub const GARBLED_THEN_FAILS: &str =
    "printf 'warn \\377\\376 garbage\\n' >&2\necho \"real error: vo init failed\" >&2\nexit 1";

/// Keeps writing to stderr after a line that is not UTF-8; dies of SIGPIPE if nobody reads.
pub const GARBLED_THEN_CHATTY: &str =
    "printf 'bad \\377\\n' >&2\nwhile true; do echo status >&2; sleep 0.05; done";

/// Only SIGKILL gets rid of it.
pub const IGNORES_SIGTERM: &str = "trap '' TERM\nwhile true; do sleep 0.1; done";

pub fn timing() -> Timing {
    Timing {
        startup_check_ms: 200,
        stop_grace_ms: 300,
        control_timeout_ms: 500,
    }
}

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A long-running player that records its arguments, one per line, to `args_file`.
pub fn recording_script(dir: &Path, args_file: &Path) -> PathBuf {
    write_script(
        dir,
        "recording-player",
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\nexec sleep 30",
            args_file.display()
        ),
    )
}

pub fn supervisor(dir: &Path, zone: ZoneId, player: &Path) -> ZoneSupervisor {
    let base = dir.join("mpvsocket").display().to_string();
    ZoneSupervisor::new(
        zone,
        ZoneConfig::default(),
        &base,
        Arc::new(MpvLauncher::new(player, Vec::new())),
        timing(),
    )
}

/// True while a process with this pid exists (and has not been reaped).
pub fn pid_exists(pid: u32) -> bool {
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok()
}
