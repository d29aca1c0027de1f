// ABOUTME: Bootstrap wizard for zonewall configuration.
// ABOUTME: Asks for the player, sockets, media directory, display size and starting layout.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use zonewall_core::{builtin_presets, Config, DisplayResolution, LayoutPreset};

fn prompt(message: &str, default: &str) -> Result<String> {
    print!("{} [{}]: ", message, default);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim();
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.to_string())
    }
}

fn prompt_number(message: &str, default: u32) -> Result<u32> {
    let answer = prompt(message, &default.to_string())?;
    answer
        .parse()
        .with_context(|| format!("{} must be a positive number", message))
}

fn prompt_choice(message: &str, choices: &[&str], default: usize) -> Result<usize> {
    println!("{}:", message);
    for (i, choice) in choices.iter().enumerate() {
        let marker = if i == default { "*" } else { " " };
        println!("  {} [{}] {}", marker, i + 1, choice);
    }

    print!("Choice [{}]: ", default + 1);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim();
    if input.is_empty() {
        Ok(default)
    } else {
        let choice: usize = input.parse().context("Invalid choice")?;
        if choice < 1 || choice > choices.len() {
            anyhow::bail!("Choice must be between 1 and {}", choices.len());
        }
        Ok(choice - 1)
    }
}

/// Seed both zones' starting geometry from a layout.
fn apply_layout(config: &mut Config, layout: &LayoutPreset) {
    config.zone1.geometry = layout.zone1;
    config.zone2.geometry = layout.zone2;
}

pub fn run_init(config_path: Option<PathBuf>) -> Result<()> {
    println!("zonewall initialization\n");

    let config_path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_default(&config_path)?;

    config.player_binary = prompt("Player binary", &config.player_binary)?;
    config.socket_base = prompt("Player control socket base", &config.socket_base)?;
    config.api_socket = prompt("API socket", &config.api_socket)?;
    config.media_dir = prompt("Media directory", &config.media_dir)?;

    let width = prompt_number("Display width", config.display.width)?;
    let height = prompt_number("Display height", config.display.height)?;
    config.display = DisplayResolution { width, height };

    let layouts = builtin_presets();
    let names: Vec<&str> = layouts.iter().map(|p| p.name.as_str()).collect();
    let default_layout = names.iter().position(|n| *n == "side-by-side").unwrap_or(0);
    let choice = prompt_choice("Starting layout", &names, default_layout)?;
    apply_layout(&mut config, &layouts[choice]);

    config.save(&config_path)?;
    println!("\nConfig written to {}", config_path.display());

    let media_dir = config.media_dir_expanded();
    match std::fs::create_dir_all(&media_dir) {
        Ok(()) => println!("Media directory ready at {}", media_dir.display()),
        Err(e) => println!(
            "Could not create media directory {}: {}",
            media_dir.display(),
            e
        ),
    }

    println!("\nReady to run: zonewall serve");

    Ok(())
}
