// ABOUTME: Zone supervision: player processes, control sockets, and the two-zone coordinator.
// ABOUTME: Everything that owns or talks to a running player lives here.

pub mod control;
pub mod coordinator;
pub mod process;
pub mod zone;

#[cfg(test)]
pub(crate) mod testing;

pub use control::{socket_path, ControlClient, ControlCommand};
pub use coordinator::Coordinator;
pub use process::{
    player_args, LaunchSpec, MpvLauncher, MpvProcess, PlayerLauncher, PlayerProcess, Termination,
};
pub use zone::{StartOptions, ZoneSupervisor};
