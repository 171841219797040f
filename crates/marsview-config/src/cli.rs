//! Command-line argument parsing for the Mars viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Mars viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "marsview", about = "Interactive Mars scene viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Planet surface texture.
    #[arg(long)]
    pub planet_texture: Option<PathBuf>,

    /// Preview planet surface texture.
    #[arg(long)]
    pub preview_texture: Option<PathBuf>,

    /// Fixed seed for star placement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the mini-planet preview.
    #[arg(long)]
    pub no_preview: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(ref path) = args.planet_texture {
            self.scene.planet_texture = path.clone();
        }
        if let Some(ref path) = args.preview_texture {
            self.scene.preview_texture = path.clone();
        }
        if let Some(seed) = args.seed {
            self.scene.star_seed = Some(seed);
        }
        if args.no_preview {
            self.preview.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
