//! `marsview`: interactive Mars scene viewer.

mod platform;
mod reload;
mod window;

use std::process::ExitCode;

use clap::Parser;
use marsview_config::{CliArgs, Config};
use marsview_viewer::{ImageFileLoader, Viewer, WorldBuilder};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match platform::AppDirs::resolve(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            marsview_log::init_logging(None, false, None);
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = dirs.create() {
        marsview_log::init_logging(None, false, None);
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let loaded = Config::load_or_create(&dirs.config_dir);
    let on_disk = loaded.as_ref().cloned().unwrap_or_default();
    let mut config = on_disk.clone();
    config.apply_cli_overrides(&args);

    marsview_log::init_logging(
        Some(dirs.log_dir.as_path()),
        cfg!(debug_assertions),
        Some(&config),
    );

    if let Err(e) = loaded {
        error!(
            "Invalid configuration in {}: {e}",
            dirs.config_dir.display()
        );
        return ExitCode::FAILURE;
    }

    info!(
        "Mars Viewer {} | config: {}",
        env!("CARGO_PKG_VERSION"),
        dirs.config_dir.display()
    );
    info!(
        "Window: {}x{} | preview: {}",
        config.window.width, config.window.height, config.preview.enabled
    );

    let world = WorldBuilder::new(&config, &ImageFileLoader).build();
    let viewer = Viewer::new(world, &config, config.window.width, config.window.height);

    let watch = reload::ConfigWatch::new(dirs.config_dir.clone(), on_disk);

    match window::run(config, viewer, watch) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
