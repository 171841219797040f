//! Tuning constants for the procedural shader materials.
//!
//! `marsview-render` emits these as WGSL `const` declarations ahead of the
//! nebula and atmosphere shaders, so editing a value here changes what is
//! drawn. Colors are sRGB; the shaders linearize them.

use glam::Vec3;

/// Nebula color at noise = -1 (before the third blend).
pub const NEBULA_COLOR_A: Vec3 = Vec3::new(0.1, 0.0, 0.3);
/// Nebula color at noise = +1 (before the third blend).
pub const NEBULA_COLOR_B: Vec3 = Vec3::new(0.3, 0.1, 0.5);
/// Blended in by `|noise|`.
pub const NEBULA_COLOR_C: Vec3 = Vec3::new(0.0, 0.1, 0.4);
pub const NEBULA_ALPHA: f32 = 0.3;
/// Spatial frequency of the interference pattern in object-space units.
pub const NEBULA_FREQUENCY: f32 = 0.01;
/// Per-axis phase speed of the pattern over shader time.
pub const NEBULA_DRIFT: Vec3 = Vec3::new(0.5, 0.3, 0.7);

pub const ATMOSPHERE_COLOR: Vec3 = Vec3::new(1.0, 0.3, 0.2);
/// Rim term is `(ATMOSPHERE_RIM_BIAS - n.z)^2` for a view-space normal `n`.
pub const ATMOSPHERE_RIM_BIAS: f32 = 0.8;
pub const ATMOSPHERE_ALPHA_SCALE: f32 = 0.3;
