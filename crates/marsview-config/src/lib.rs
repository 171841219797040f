//! Configuration system for the Mars viewer.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, change detection for hot-reload (the app
//! polls it on window focus), and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, CameraConfig, Config, DebugConfig, InputConfig, PreviewConfig, SceneConfig,
    WindowConfig,
};
pub use error::ConfigError;
