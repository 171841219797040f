//! Surface descriptions attached to renderables.

use crate::{Color, TextureHandle};

/// Which triangle faces are rasterised (and hit-tested).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
}

/// How fragments combine with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Alpha blending (`src * a + dst * (1 - a)`).
    Normal,
    /// `src * a + dst`.
    Additive,
}

/// Built-in procedural fragment programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    /// Animated interference colors on the background shell.
    Nebula,
    /// View-dependent rim glow.
    Atmosphere,
}

#[derive(Debug, Clone)]
pub enum Material {
    Standard(StandardMaterial),
    Points(PointsMaterial),
    Shader(ShaderMaterial),
}

/// Lit surface with an optional albedo map.
#[derive(Debug, Clone)]
pub struct StandardMaterial {
    /// Multiplied with the map when present.
    pub color: Color,
    pub map: Option<TextureHandle>,
}

/// Camera-facing points colored per vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    /// Point diameter in pixels, or in world units when `size_attenuation`
    /// is set.
    pub size: f32,
    pub opacity: f32,
    /// Shrink points with view depth (a `size`-unit disc seen in
    /// perspective, never below one pixel).
    pub size_attenuation: bool,
}

/// Procedural material driven by a time uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderMaterial {
    pub program: ShaderProgram,
    /// Seconds-like counter advanced once per frame.
    pub time: f32,
    pub blend: BlendMode,
    pub side: Side,
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self {
            size: 2.0,
            opacity: 0.8,
            size_attenuation: true,
        }
    }
}

impl ShaderMaterial {
    pub fn new(program: ShaderProgram, blend: BlendMode, side: Side) -> Self {
        Self {
            program,
            time: 0.0,
            blend,
            side,
        }
    }
}

impl Material {
    /// Faces the material renders; `None` for non-surface materials.
    pub fn side(&self) -> Option<Side> {
        match self {
            Material::Standard(_) => Some(Side::Front),
            Material::Points(_) => None,
            Material::Shader(m) => Some(m.side),
        }
    }

    /// Mutable access to the time uniform, if this material has one.
    pub fn time_uniform_mut(&mut self) -> Option<&mut f32> {
        match self {
            Material::Shader(m) => Some(&mut m.time),
            _ => None,
        }
    }

    pub fn time_uniform(&self) -> Option<f32> {
        match self {
            Material::Shader(m) => Some(m.time),
            _ => None,
        }
    }

    /// Whether the material draws in the blended (depth-read-only) pass.
    pub fn is_transparent(&self) -> bool {
        !matches!(self, Material::Standard(_))
    }
}
