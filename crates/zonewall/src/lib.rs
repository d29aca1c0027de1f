// ABOUTME: zonewall library with the zone supervisor, coordinator, and control API.
// ABOUTME: Re-exports for programmatic use and the daemon entry point.

pub mod api;
pub mod init;
pub mod source;
pub mod supervisor;

pub use api::{ApiClient, ApiHandler, Request, Response};
pub use init::run_init;
pub use source::SourceResolver;
pub use supervisor::{
    Coordinator, ControlClient, ControlCommand, MpvLauncher, PlayerLauncher, PlayerProcess,
    StartOptions, ZoneSupervisor,
};
pub use zonewall_core::Config;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use zonewall_core::merge_presets;

/// Options for running the daemon
pub struct ServeOptions {
    /// Path to configuration file
    pub config_path: Option<PathBuf>,
    /// Override for the API socket path from the config
    pub api_socket: Option<PathBuf>,
}

/// Load the config file, falling back to defaults when there is none.
pub fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    Config::load_or_default(&config_path)
}

/// Run the daemon until Ctrl+C or SIGTERM, then stop both zones.
pub async fn run_server(options: ServeOptions) -> Result<()> {
    let config = load_config(options.config_path)?;
    let api_socket = options
        .api_socket
        .unwrap_or_else(|| config.api_socket_expanded());

    let launcher = Arc::new(MpvLauncher::new(
        config.player_binary_expanded(),
        config.extra_args.clone(),
    ));
    let coordinator = Arc::new(Coordinator::from_config(&config, launcher));
    let handler = Arc::new(ApiHandler::new(
        coordinator.clone(),
        SourceResolver::new(config.media_dir_expanded()),
        merge_presets(&config.presets),
    ));

    tracing::info!(
        player = %config.player_binary,
        socket_base = %config.socket_base,
        media_dir = %config.media_dir,
        "zonewall starting"
    );

    let listener = api::bind_api_socket(&api_socket)?;
    let result = tokio::select! {
        result = api::serve_api(listener, handler) => result,
        _ = shutdown_signal() => Ok(()),
    };

    coordinator.stop_all().await;
    if let Err(e) = std::fs::remove_file(&api_socket) {
        tracing::debug!(path = %api_socket.display(), error = %e, "API socket already gone");
    }
    tracing::info!("zonewall shut down");

    result
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
