// ABOUTME: zonewall CLI entry point.
// ABOUTME: Runs the daemon or sends one control request to a running daemon.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use zonewall::{load_config, run_init, run_server, ApiClient, Request, ServeOptions};
use zonewall_core::GeometryPatch;

#[derive(Parser)]
#[command(name = "zonewall")]
#[command(about = "Dual-zone video wall supervisor for mpv")]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, env = "ZONEWALL_CONFIG")]
    config: Option<PathBuf>,

    /// API socket path (defaults to the one in the config)
    #[arg(long, global = true, env = "ZONEWALL_SOCKET")]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct GeometryArgs {
    /// Left edge in pixels
    #[arg(long, allow_negative_numbers = true)]
    x: Option<i32>,
    /// Top edge in pixels
    #[arg(long, allow_negative_numbers = true)]
    y: Option<i32>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
}

impl GeometryArgs {
    fn patch(&self) -> GeometryPatch {
        GeometryPatch {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a zonewall configuration
    Init,
    /// Run the supervisor daemon
    Serve,
    /// Start playback in a zone (file name, path, or rtsp/http URL)
    Play {
        zone: i64,
        source: String,
        #[command(flatten)]
        geometry: GeometryArgs,
        /// Volume 0-100
        #[arg(long, allow_negative_numbers = true)]
        volume: Option<i64>,
        /// Play once instead of looping
        #[arg(long)]
        no_loop: bool,
    },
    /// Stop a zone
    Stop { zone: i64 },
    /// Stop both zones
    StopAll,
    /// Toggle pause in a zone
    Pause { zone: i64 },
    /// Seek relative to the current position
    Seek {
        zone: i64,
        #[arg(allow_negative_numbers = true)]
        seconds: f64,
    },
    /// Set a zone's volume (clamped to 0-100)
    Volume {
        zone: i64,
        #[arg(allow_negative_numbers = true)]
        volume: i64,
    },
    /// Move or resize a zone; a playing zone restarts on the same source
    Geometry {
        zone: i64,
        #[command(flatten)]
        geometry: GeometryArgs,
    },
    /// Show status for one zone or the whole wall
    Status { zone: Option<i64> },
    /// Show or set the display resolution
    Resolution {
        #[arg(requires = "height")]
        width: Option<u32>,
        height: Option<u32>,
    },
    /// List layout presets
    Presets,
    /// Apply a layout preset to both zones
    Preset { name: String },
    /// Daemon health
    Health,
}

impl Commands {
    fn into_request(self) -> Option<Request> {
        let request = match self {
            Commands::Init | Commands::Serve => return None,
            Commands::Play {
                zone,
                source,
                geometry,
                volume,
                no_loop,
            } => {
                let patch = geometry.patch();
                Request::Play {
                    zone,
                    source,
                    geometry: (!patch.is_empty()).then_some(patch),
                    volume,
                    loop_playback: no_loop.then_some(false),
                }
            }
            Commands::Stop { zone } => Request::Stop { zone },
            Commands::StopAll => Request::StopAll,
            Commands::Pause { zone } => Request::Pause { zone },
            Commands::Seek { zone, seconds } => Request::Seek { zone, seconds },
            Commands::Volume { zone, volume } => Request::Volume { zone, volume },
            Commands::Geometry { zone, geometry } => Request::Geometry {
                zone,
                geometry: geometry.patch(),
            },
            Commands::Status { zone } => Request::Status { zone },
            Commands::Resolution {
                width: Some(width),
                height: Some(height),
            } => Request::SetResolution { width, height },
            Commands::Resolution { .. } => Request::Resolution,
            Commands::Presets => Request::Presets,
            Commands::Preset { name } => Request::ApplyPreset { name },
            Commands::Health => Request::Health,
        };
        Some(request)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => run_init(cli.config),
        Commands::Serve => {
            zonewall_log::init();
            run_server(ServeOptions {
                config_path: cli.config,
                api_socket: cli.socket,
            })
            .await
        }
        command => {
            zonewall_log::init_for("zonewall");
            let Some(request) = command.into_request() else {
                return Ok(());
            };
            let socket = match cli.socket {
                Some(path) => path,
                None => load_config(cli.config)?.api_socket_expanded(),
            };

            let response = ApiClient::new(socket).send(&request).await?;
            if let Some(data) = &response.data {
                println!("{}", serde_json::to_string_pretty(data)?);
            }
            if !response.success {
                bail!(response
                    .error
                    .unwrap_or_else(|| "Request failed".to_string()));
            }
            Ok(())
        }
    }
}
