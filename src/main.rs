//! Custom Player Anthems - desktop host
//!
//! Runs the plugin in a standalone window with simulated game events.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use player_anthems::audio::{AnthemPlayer, NullAnthemPlayer, RodioAnthemPlayer};
use player_anthems::config::{ConfigStore, TomlFileBackend};
use player_anthems::desktop::{DesktopHost, DesktopKeys, SimulatedMatch};
use player_anthems::plugin::{AnthemsPlugin, PLUGIN_NAME};
use player_anthems::storage;

/// Custom Player Anthems desktop host
#[derive(Parser, Debug)]
#[command(name = "player-anthems")]
#[command(about = "Custom goal anthems with a toggleable overlay window")]
struct Args {
    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only react to function keys while the window has focus
    #[arg(long)]
    no_hotkeys: bool,

    /// Do not open an audio device
    #[arg(long)]
    mute: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let settings_path = match args.config {
        Some(path) => path,
        None => storage::default_settings_path()?,
    };
    info!("Using settings file {:?}", settings_path);

    let config = ConfigStore::open(TomlFileBackend::new(settings_path));
    let player = create_player(args.mute);
    let keys = DesktopKeys::detect(!args.no_hotkeys);

    let plugin = AnthemsPlugin::load(config, keys, Box::new(SimulatedMatch), player)?;
    let host = DesktopHost::new(plugin);

    eframe::run_native(
        PLUGIN_NAME,
        DesktopHost::options(),
        Box::new(|_cc| Ok(Box::new(host))),
    )
    .map_err(|e| anyhow!("Desktop host error: {}", e))?;

    info!("{} shutdown complete", PLUGIN_NAME);
    Ok(())
}

/// Open the audio device, falling back to silence
fn create_player(mute: bool) -> Box<dyn AnthemPlayer> {
    if mute {
        return Box::new(NullAnthemPlayer);
    }
    match RodioAnthemPlayer::new() {
        Ok(player) => Box::new(player),
        Err(e) => {
            warn!("No audio output, anthems will be silent: {:#}", e);
            Box::new(NullAnthemPlayer)
        }
    }
}
