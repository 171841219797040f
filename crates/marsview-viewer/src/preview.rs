//! Self-contained mini-planet scene rendered into its own square target.

use glam::Vec3;
use marsview_scene::{
    Color, Geometry, Light, Material, Node, NodeId, NodeKind, PerspectiveCamera, SceneGraph,
    SphereGeometry, StandardMaterial, TextureHandle,
};

use crate::world::{PLANET_BASE_COLOR, add_light};

const PREVIEW_FOV_DEGREES: f32 = 50.0;
const PREVIEW_NEAR: f32 = 0.1;
const PREVIEW_FAR: f32 = 1000.0;
const PREVIEW_DISTANCE: f32 = 3.0;

/// A spinning planet with its own camera and lights, unaffected by input.
#[derive(Debug, Clone)]
pub struct PreviewScene {
    pub graph: SceneGraph,
    pub camera: PerspectiveCamera,
    pub group: NodeId,
    pub planet: NodeId,
    /// Edge length of the square render target in pixels.
    pub size: u32,
    texture: TextureHandle,
}

impl PreviewScene {
    pub fn new(texture: TextureHandle, size: u32) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let group = graph.add(root, Node::new("preview-group", NodeKind::Group));
        let planet = graph.add(
            group,
            Node::new("preview-planet", NodeKind::Decoration).with_renderable(
                Geometry::Sphere(SphereGeometry::new(1.0, 64, 64)),
                Material::Standard(StandardMaterial {
                    color: Color::from_hex(PLANET_BASE_COLOR),
                    map: Some(texture.clone()),
                }),
            ),
        );

        add_light(
            &mut graph,
            "preview-sun",
            Light::Directional {
                color: Color::WHITE,
                intensity: 1.0,
            },
            Vec3::new(5.0, 5.0, 5.0),
        );
        add_light(
            &mut graph,
            "preview-ambient",
            Light::Ambient {
                color: Color::from_hex(0x404040),
                intensity: 0.3,
            },
            Vec3::ZERO,
        );

        let camera = PerspectiveCamera::new(PREVIEW_FOV_DEGREES, 1.0, PREVIEW_NEAR, PREVIEW_FAR)
            .with_position(Vec3::new(0.0, 0.0, PREVIEW_DISTANCE));

        Self {
            graph,
            camera,
            group,
            planet,
            size: size.max(1),
            texture,
        }
    }

    /// Advance the preview spin about Y.
    pub fn tick(&mut self, yaw_step: f32) {
        if let Some(group) = self.graph.get_mut(self.group) {
            group.transform.rotation.y += yaw_step;
        }
    }

    pub fn yaw(&self) -> f32 {
        self.graph
            .get(self.group)
            .map_or(0.0, |g| g.transform.rotation.y)
    }

    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marsview_scene::ImageData;
    use std::sync::Arc;

    fn preview() -> PreviewScene {
        PreviewScene::new(Arc::new(ImageData::solid("t", Color::WHITE)), 256)
    }

    #[test]
    fn test_camera_parameters() {
        let p = preview();
        assert!((p.camera.fov_y - 50f32.to_radians()).abs() < 1e-6);
        assert_eq!(p.camera.aspect, 1.0);
        assert_eq!(p.camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(p.size, 256);
    }

    #[test]
    fn test_tick_spins_about_y() {
        let mut p = preview();
        for _ in 0..100 {
            p.tick(0.01);
        }
        assert!((p.yaw() - 1.0).abs() < 1e-4);
        let group = p.graph.get(p.group).unwrap();
        assert_eq!(group.transform.rotation.x, 0.0);
    }

    #[test]
    fn test_preview_planet_not_pickable_as_main_planet() {
        let p = preview();
        assert_eq!(p.graph.get(p.planet).unwrap().kind, NodeKind::Decoration);
        assert_eq!(p.graph.lights().len(), 2);
    }
}
