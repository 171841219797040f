//! Renderable geometry: parametric UV spheres and shared point clouds.

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use glam::Vec3;

use crate::starfield::PointCloud;

/// Geometry attached to a renderable node.
#[derive(Debug, Clone)]
pub enum Geometry {
    /// A UV sphere centred on the node origin.
    Sphere(SphereGeometry),
    /// A fixed set of colored points.
    Points(Arc<PointCloud>),
}

/// Parameters of a latitude/longitude sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    /// Segments around the equator (minimum 3).
    pub width_segments: u32,
    /// Segments from pole to pole (minimum 2).
    pub height_segments: u32,
}

/// Triangulated sphere ready for upload.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub positions: Vec<Vec3>,
    /// Unit outward normals.
    pub normals: Vec<Vec3>,
    /// `u` runs west to east around the equator, `v` runs from the north pole
    /// (0) to the south pole (1), matching wgpu texture addressing.
    pub uvs: Vec<[f32; 2]>,
    /// Counter-clockwise when seen from outside.
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    /// Build the vertex grid and triangle list.
    ///
    /// The grid has `(width + 1) * (height + 1)` vertices so the seam column
    /// carries both `u = 0` and `u = 1`. Pole rows emit a single triangle per
    /// quad, so no degenerate triangles are produced.
    pub fn build(&self) -> SphereMesh {
        let ws = self.width_segments;
        let hs = self.height_segments;
        let vertex_count = ((ws + 1) * (hs + 1)) as usize;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            // Centre the pole texel between its neighbours.
            let u_offset = if iy == 0 {
                0.5 / ws as f32
            } else if iy == hs {
                -0.5 / ws as f32
            } else {
                0.0
            };

            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let (sin_phi, cos_phi) = (v * PI).sin_cos();
                let (sin_theta, cos_theta) = (u * TAU).sin_cos();

                let normal = Vec3::new(-cos_theta * sin_phi, cos_phi, sin_theta * sin_phi);
                positions.push(normal * self.radius);
                normals.push(normal.normalize_or_zero());
                uvs.push([u + u_offset, v]);
            }
        }

        let row = ws + 1;
        let mut indices = Vec::with_capacity((ws * (hs - 1) * 6) as usize);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        SphereMesh {
            positions,
            normals,
            uvs,
            indices,
        }
    }
}
