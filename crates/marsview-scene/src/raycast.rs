//! Analytic ray picking against sphere renderables.

use glam::Vec3;

use crate::{Geometry, NodeId, SceneGraph, Side};

/// A half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; `direction` is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the sphere surface seen from this ray, honouring which
    /// faces are visible.
    ///
    /// Front faces are hit where the ray enters; back faces where it exits.
    /// Hits behind the origin are discarded.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32, side: Side) -> Option<f32> {
        if self.direction == Vec3::ZERO || radius <= 0.0 {
            return None;
        }
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let (t_enter, t_exit) = (-b - root, -b + root);

        match side {
            Side::Front if t_enter >= 0.0 => Some(t_enter),
            Side::Back if t_exit >= 0.0 => Some(t_exit),
            _ => None,
        }
    }
}

/// The nearest object under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

/// Find the closest pickable renderable along `ray`.
///
/// Spheres are tested in world space (uniformly scaled by the largest axis
/// scale of their world matrix). Point clouds never report hits.
pub fn hit_test(graph: &SceneGraph, ray: &Ray) -> Option<RayHit> {
    let worlds = graph.world_matrices();

    graph
        .iter()
        .filter_map(|(id, node)| {
            let renderable = node.renderable.as_ref()?;
            let Geometry::Sphere(sphere) = &renderable.geometry else {
                return None;
            };
            let side = renderable.material.side()?;

            let world = worlds[id.index()];
            let (scale, _, translation) = world.to_scale_rotation_translation();
            let radius = sphere.radius * scale.abs().max_element();

            let distance = ray.intersect_sphere(translation, radius, side)?;
            Some(RayHit {
                node: id,
                distance,
                point: ray.at(distance),
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BlendMode, Color, Material, Node, NodeKind, PointsMaterial, ShaderMaterial, ShaderProgram,
        SphereGeometry, StandardMaterial, Transform,
    };
    use crate::starfield::PointCloud;
    use std::sync::Arc;

    fn planet_material() -> Material {
        Material::Standard(StandardMaterial {
            color: Color::WHITE,
            map: None,
        })
    }

    fn shell_material() -> Material {
        Material::Shader(ShaderMaterial::new(
            ShaderProgram::Atmosphere,
            BlendMode::Additive,
            Side::Back,
        ))
    }

    fn planet_scene() -> (SceneGraph, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.add(root, Node::new("group", NodeKind::Group));
        let planet = graph.add(
            group,
            Node::new("planet", NodeKind::Planet).with_renderable(
                Geometry::Sphere(SphereGeometry::new(2.0, 16, 16)),
                planet_material(),
            ),
        );
        let atmosphere = graph.add(
            group,
            Node::new("atmosphere", NodeKind::Decoration).with_renderable(
                Geometry::Sphere(SphereGeometry::new(2.1, 16, 16)),
                shell_material(),
            ),
        );
        (graph, planet, atmosphere)
    }

    #[test]
    fn test_front_face_reports_entry() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 2.0, Side::Front).unwrap();
        assert!((t - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_back_face_reports_exit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 2.0, Side::Back).unwrap();
        assert!((t - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_front_face_invisible_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(ray.intersect_sphere(Vec3::ZERO, 5.0, Side::Front).is_none());
        assert!(ray.intersect_sphere(Vec3::ZERO, 5.0, Side::Back).is_some());
    }

    #[test]
    fn test_sphere_behind_ray_missed() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::Z);
        assert!(ray.intersect_sphere(Vec3::ZERO, 2.0, Side::Front).is_none());
        assert!(ray.intersect_sphere(Vec3::ZERO, 2.0, Side::Back).is_none());
    }

    #[test]
    fn test_planet_wins_over_back_face_shell() {
        let (graph, planet, _) = planet_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::NEG_Z);
        let hit = hit_test(&graph, &ray).unwrap();
        assert_eq!(hit.node, planet);
        assert!((hit.point - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn test_rim_ray_hits_shell_not_planet() {
        let (graph, _, atmosphere) = planet_scene();
        let ray = Ray::new(Vec3::new(2.05, 0.0, 8.0), Vec3::NEG_Z);
        let hit = hit_test(&graph, &ray).unwrap();
        assert_eq!(hit.node, atmosphere);
    }

    #[test]
    fn test_empty_space_has_no_hit() {
        let (graph, _, _) = planet_scene();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::Y);
        assert!(hit_test(&graph, &ray).is_none());
    }

    #[test]
    fn test_points_not_pickable() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let cloud = PointCloud {
            positions: vec![Vec3::new(0.0, 0.0, -5.0)],
            colors: vec![Color::WHITE],
        };
        graph.add(
            root,
            Node::new("stars", NodeKind::Decoration).with_renderable(
                Geometry::Points(Arc::new(cloud)),
                Material::Points(PointsMaterial::default()),
            ),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(hit_test(&graph, &ray).is_none());
    }

    #[test]
    fn test_world_transform_moves_sphere() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.add(
            root,
            Node::new("group", NodeKind::Group).with_transform(Transform {
                position: Vec3::new(10.0, 0.0, 0.0),
                scale: Vec3::splat(2.0),
                ..Transform::default()
            }),
        );
        let planet = graph.add(
            group,
            Node::new("planet", NodeKind::Planet).with_renderable(
                Geometry::Sphere(SphereGeometry::new(1.0, 8, 8)),
                planet_material(),
            ),
        );

        let ray = Ray::new(Vec3::new(10.0, 0.0, 8.0), Vec3::NEG_Z);
        let hit = hit_test(&graph, &ray).unwrap();
        assert_eq!(hit.node, planet);
        // Scaled radius 2 -> entry at z = 2.
        assert!((hit.distance - 6.0).abs() < 1e-4);

        let miss = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::NEG_Z);
        assert!(hit_test(&graph, &miss).is_none());
    }
}
