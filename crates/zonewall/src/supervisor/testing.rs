// ABOUTME: In-memory player launcher for supervisor and coordinator unit tests.
// ABOUTME: Records every spawn and lets tests kill players or make the next spawn die.

use super::process::{LaunchSpec, PlayerLauncher, PlayerProcess, Termination};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zonewall_core::{Timing, ZoneConfig, ZoneError, ZoneId};

pub fn fast_timing() -> Timing {
    Timing {
        startup_check_ms: 10,
        stop_grace_ms: 50,
        control_timeout_ms: 200,
    }
}

#[derive(Debug, Clone)]
pub struct SpawnRecord {
    pub zone: ZoneId,
    pub config: ZoneConfig,
    pub socket_path: PathBuf,
    pub source: String,
}

#[derive(Default)]
struct FakeState {
    spawned: Vec<SpawnRecord>,
    alive: Vec<Arc<AtomicBool>>,
    terminations: Vec<Termination>,
    fail_next: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakeLauncher {
    state: Arc<Mutex<FakeState>>,
    next_pid: Arc<AtomicU32>,
    ignore_sigterm: bool,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self {
            next_pid: Arc::new(AtomicU32::new(1000)),
            ..Self::default()
        }
    }

    /// Players from this launcher only go away on the forced kill.
    pub fn ignoring_sigterm(mut self) -> Self {
        self.ignore_sigterm = true;
        self
    }

    /// The next spawned player exits during startup with this stderr.
    pub fn fail_next_with(&self, stderr: &str) {
        self.state.lock().unwrap().fail_next = Some(stderr.to_string());
    }

    pub fn spawned(&self) -> Vec<SpawnRecord> {
        self.state.lock().unwrap().spawned.clone()
    }

    pub fn spawned_for(&self, zone: ZoneId) -> Vec<SpawnRecord> {
        self.spawned().into_iter().filter(|r| r.zone == zone).collect()
    }

    pub fn live_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state
            .alive
            .iter()
            .filter(|a| a.load(Ordering::SeqCst))
            .count()
    }

    /// Simulate every player crashing.
    pub fn kill_all(&self) {
        let state = self.state.lock().unwrap();
        for alive in &state.alive {
            alive.store(false, Ordering::SeqCst);
        }
    }

    pub fn terminations(&self) -> Vec<Termination> {
        self.state.lock().unwrap().terminations.clone()
    }
}

impl PlayerLauncher for FakeLauncher {
    fn spawn(&self, spec: &LaunchSpec<'_>) -> Result<Box<dyn PlayerProcess>, ZoneError> {
        let mut state = self.state.lock().unwrap();
        state.spawned.push(SpawnRecord {
            zone: spec.zone,
            config: *spec.config,
            socket_path: spec.socket_path.to_path_buf(),
            source: spec.source.to_string(),
        });

        let stderr = state.fail_next.take();
        let alive = Arc::new(AtomicBool::new(stderr.is_none()));
        state.alive.push(alive.clone());

        Ok(Box::new(FakeProcess {
            pid: self.next_pid.fetch_add(1, Ordering::SeqCst),
            alive,
            stderr: stderr.unwrap_or_default(),
            ignore_sigterm: self.ignore_sigterm,
            state: self.state.clone(),
        }))
    }
}

struct FakeProcess {
    pid: u32,
    alive: Arc<AtomicBool>,
    stderr: String,
    ignore_sigterm: bool,
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl PlayerProcess for FakeProcess {
    fn pid(&self) -> Option<u32> {
        self.is_alive_now().then_some(self.pid)
    }

    fn is_alive(&mut self) -> bool {
        self.is_alive_now()
    }

    async fn diagnostics(&mut self) -> String {
        std::mem::take(&mut self.stderr)
    }

    async fn terminate(&mut self, grace: Duration) -> Termination {
        let outcome = if !self.is_alive_now() {
            Termination::AlreadyExited
        } else if self.ignore_sigterm {
            tokio::time::sleep(grace).await;
            Termination::Forced
        } else {
            Termination::Graceful
        };
        self.alive.store(false, Ordering::SeqCst);
        self.state.lock().unwrap().terminations.push(outcome);
        outcome
    }
}

impl FakeProcess {
    fn is_alive_now(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}
