//! Uniform block layouts shared with the WGSL shaders.
//!
//! Every block is a multiple of 16 bytes and uses only `vec4`/`mat4` members
//! so the Rust and WGSL layouts agree without padding rules.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use marsview_scene::{Light, PerspectiveCamera};

pub const MAX_DIRECTIONAL_LIGHTS: usize = 2;
pub const MAX_POINT_LIGHTS: usize = 2;

/// `@group(0) @binding(0)` in every scene shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    /// World-space eye position; w unused.
    pub position: [f32; 4],
    /// Target size in pixels in xy; used to size point sprites.
    pub viewport: [f32; 4],
}

impl CameraUniform {
    pub fn new(camera: &PerspectiveCamera, width: u32, height: u32) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            position: camera.position.extend(1.0).to_array(),
            viewport: [width.max(1) as f32, height.max(1) as f32, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// Unit vector from the surface toward the light.
    pub direction: [f32; 4],
    pub radiance: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    /// xyz position, w range.
    pub position_range: [f32; 4],
    pub radiance: [f32; 4],
}

/// `@group(0) @binding(1)`: every light of a graph folded into one block.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 4],
    pub directional: [DirectionalLightUniform; MAX_DIRECTIONAL_LIGHTS],
    pub point: [PointLightUniform; MAX_POINT_LIGHTS],
    /// x = directional count, y = point count.
    pub counts: [u32; 4],
}

impl LightsUniform {
    /// Pack `(light, world position)` pairs. Ambient lights sum; extra
    /// directional or point lights beyond the fixed slots are dropped.
    pub fn from_lights(lights: &[(Light, Vec3)]) -> Self {
        let mut out = Self::default();
        let mut ambient = Vec3::ZERO;
        let (mut n_dir, mut n_point) = (0usize, 0usize);

        for (light, position) in lights {
            let radiance = Vec3::from_array(light.radiance().to_array());
            match light {
                Light::Ambient { .. } => ambient += radiance,
                Light::Directional { .. } => {
                    if n_dir == MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("Ignoring directional light beyond {MAX_DIRECTIONAL_LIGHTS}");
                        continue;
                    }
                    let direction = position.try_normalize().unwrap_or(Vec3::Y);
                    out.directional[n_dir] = DirectionalLightUniform {
                        direction: direction.extend(0.0).to_array(),
                        radiance: radiance.extend(1.0).to_array(),
                    };
                    n_dir += 1;
                }
                Light::Point { range, .. } => {
                    if n_point == MAX_POINT_LIGHTS {
                        log::warn!("Ignoring point light beyond {MAX_POINT_LIGHTS}");
                        continue;
                    }
                    out.point[n_point] = PointLightUniform {
                        position_range: position.extend(*range).to_array(),
                        radiance: radiance.extend(1.0).to_array(),
                    };
                    n_point += 1;
                }
            }
        }

        out.ambient = ambient.extend(1.0).to_array();
        out.counts = [n_dir as u32, n_point as u32, 0, 0];
        out
    }
}

/// `@group(1) @binding(0)`: per-node transform and material parameters.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`, widened to a mat4.
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear base color in rgb, opacity in a.
    pub color: [f32; 4],
    /// x = shader time, y = point size in pixels.
    pub params: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, color: [f32; 4], params: [f32; 4]) -> Self {
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marsview_scene::Color;

    #[test]
    fn test_block_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 160);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 160);
        assert_eq!(std::mem::size_of::<LightsUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 16 + 64 + 64 + 16);
    }

    #[test]
    fn test_camera_uniform_carries_viewport() {
        let camera = PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 10_000.0)
            .with_position(Vec3::new(0.0, 0.0, 8.0));
        let u = CameraUniform::new(&camera, 1280, 720);
        assert_eq!(u.viewport[..2], [1280.0, 720.0]);
        assert_eq!(u.position, [0.0, 0.0, 8.0, 1.0]);
        assert_eq!(
            Mat4::from_cols_array_2d(&u.view_proj),
            camera.view_projection_matrix()
        );
    }

    #[test]
    fn test_lights_are_packed_by_kind() {
        let lights = [
            (
                Light::Directional {
                    color: Color::WHITE,
                    intensity: 1.5,
                },
                Vec3::new(10.0, 5.0, 5.0),
            ),
            (
                Light::Ambient {
                    color: Color::WHITE,
                    intensity: 0.25,
                },
                Vec3::ZERO,
            ),
            (
                Light::Ambient {
                    color: Color::WHITE,
                    intensity: 0.25,
                },
                Vec3::ZERO,
            ),
            (
                Light::Point {
                    color: Color::WHITE,
                    intensity: 0.8,
                    range: 100.0,
                },
                Vec3::ZERO,
            ),
        ];
        let u = LightsUniform::from_lights(&lights);
        assert_eq!(u.counts[..2], [1, 1]);
        assert!((u.ambient[0] - 0.5).abs() < 1e-6);

        let dir = Vec3::from_slice(&u.directional[0].direction[..3]);
        assert!((dir - Vec3::new(10.0, 5.0, 5.0).normalize()).length() < 1e-6);
        assert!((u.directional[0].radiance[0] - 1.5).abs() < 1e-6);
        assert_eq!(u.point[0].position_range[3], 100.0);
    }

    #[test]
    fn test_excess_lights_are_dropped() {
        let sun = (
            Light::Directional {
                color: Color::WHITE,
                intensity: 1.0,
            },
            Vec3::X,
        );
        let u = LightsUniform::from_lights(&[sun, sun, sun]);
        assert_eq!(u.counts[0], MAX_DIRECTIONAL_LIGHTS as u32);
    }

    #[test]
    fn test_normal_matrix_handles_degenerate_model() {
        let u = ObjectUniform::new(Mat4::ZERO, [1.0; 4], [0.0; 4]);
        assert_eq!(Mat4::from_cols_array_2d(&u.normal_matrix), Mat4::IDENTITY);

        let scaled = Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0));
        let u = ObjectUniform::new(scaled, [1.0; 4], [0.0; 4]);
        let n = Mat4::from_cols_array_2d(&u.normal_matrix);
        assert!((n.x_axis.x - 0.5).abs() < 1e-6);
    }
}
