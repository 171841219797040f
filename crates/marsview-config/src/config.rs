//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "marsview";
const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// World construction settings.
    pub scene: SceneConfig,
    /// Main camera settings.
    pub camera: CameraConfig,
    /// Per-frame animation increments.
    pub animation: AnimationConfig,
    /// Pointer and gesture settings.
    pub input: InputConfig,
    /// Mini-planet preview settings.
    pub preview: PreviewConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// World builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of stars in the point cloud.
    pub star_count: u32,
    /// Seed for star placement. `None` draws a fresh seed at startup.
    pub star_seed: Option<u64>,
    /// Inner radius of the star shell.
    pub star_inner_radius: f32,
    /// Outer radius of the star shell.
    pub star_outer_radius: f32,
    /// Star point size: world units when attenuated, pixels otherwise.
    pub star_size: f32,
    /// Shrink stars with distance from the camera.
    pub star_size_attenuation: bool,
    /// Radius of the enclosing nebula sphere.
    pub nebula_radius: f32,
    /// Planet sphere radius.
    pub planet_radius: f32,
    /// Longitude/latitude segments of the planet sphere.
    pub planet_segments: u32,
    /// Atmosphere shell radius.
    pub atmosphere_radius: f32,
    /// Path of the planet surface texture.
    pub planet_texture: PathBuf,
    /// Path of the preview planet surface texture.
    pub preview_texture: PathBuf,
}

/// Main camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Initial distance along +Z.
    pub start_distance: f32,
    /// Closest allowed zoom distance.
    pub min_distance: f32,
    /// Farthest allowed zoom distance.
    pub max_distance: f32,
    /// Exponential smoothing factor applied per frame.
    pub follow_factor: f32,
    /// Camera offset reached at a fully deflected pointer.
    pub follow_range: f32,
    /// Distance moved per wheel pixel.
    pub zoom_scale: f32,
}

/// Fixed per-frame animation increments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Planet group yaw step in radians.
    pub planet_yaw_step: f32,
    /// Planet group pitch step in radians.
    pub planet_pitch_step: f32,
    /// Starfield yaw step in radians.
    pub star_spin_step: f32,
    /// Shader time uniform increment.
    pub shader_time_step: f32,
    /// Preview planet yaw step in radians.
    pub preview_spin_step: f32,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum gap between two taps/clicks forming a double gesture.
    pub double_gesture_window_ms: u64,
    /// Pixels reported per wheel line.
    pub wheel_pixels_per_line: f32,
}

/// Preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Render the preview at all.
    pub enabled: bool,
    /// Edge length of the square preview target in pixels.
    pub size: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Mars Viewer".to_string(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 10_000,
            star_seed: None,
            star_inner_radius: 1000.0,
            star_outer_radius: 3000.0,
            star_size: 2.0,
            star_size_attenuation: true,
            nebula_radius: 1500.0,
            planet_radius: 2.0,
            planet_segments: 128,
            atmosphere_radius: 2.1,
            planet_texture: PathBuf::from("assets/mars-map.png"),
            preview_texture: PathBuf::from("assets/minimars-map.png"),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 10_000.0,
            start_distance: 8.0,
            min_distance: 3.0,
            max_distance: 15.0,
            follow_factor: 0.05,
            follow_range: 5.0,
            zoom_scale: 0.01,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            planet_yaw_step: 0.002,
            planet_pitch_step: 0.001,
            star_spin_step: 0.0002,
            shader_time_step: 0.01,
            preview_spin_step: 0.01,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_gesture_window_ms: 300,
            wheel_pixels_per_line: 100.0,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 256,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl CameraConfig {
    /// Zoom limits as an ordered `(min, max)` pair.
    ///
    /// Inverted limits are swapped. A non-finite limit falls back to the
    /// default pair, so the result is always safe to pass to `f32::clamp`.
    pub fn distance_limits(&self) -> (f32, f32) {
        let (min, max) = (self.min_distance, self.max_distance);
        if !min.is_finite() || !max.is_finite() {
            let defaults = Self::default();
            log::warn!("Non-finite camera distance limits ({min}, {max}); using defaults");
            return (defaults.min_distance, defaults.max_distance);
        }
        if min > max {
            log::warn!("Camera min_distance {min} exceeds max_distance {max}; swapping");
            (max, min)
        } else {
            (min, max)
        }
    }

    /// Start distance clamped into [`distance_limits`](Self::distance_limits).
    pub fn clamped_start_distance(&self) -> f32 {
        let (min, max) = self.distance_limits();
        if self.start_distance.is_finite() {
            self.start_distance.clamp(min, max)
        } else {
            Self::default().start_distance.clamp(min, max)
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform configuration directory for the viewer (`<config>/marsview`).
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|base| base.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
