//! Light sources. Position and direction come from the owning node.

use crate::Color;

/// A light attached to a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform fill light.
    Ambient { color: Color, intensity: f32 },
    /// Parallel light shining from the node position toward the origin.
    Directional { color: Color, intensity: f32 },
    /// Omni light at the node position, fading to zero at `range`.
    Point {
        color: Color,
        intensity: f32,
        range: f32,
    },
}

impl Light {
    /// Linear radiance contribution before attenuation.
    pub fn radiance(&self) -> Color {
        match *self {
            Light::Ambient { color, intensity }
            | Light::Directional { color, intensity }
            | Light::Point {
                color, intensity, ..
            } => color.scaled(intensity),
        }
    }
}
