//! One-shot construction of the main scene and the preview scene.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use marsview_config::Config;
use marsview_scene::{
    BlendMode, Color, Geometry, ImageData, Light, Material, Node, NodeId, NodeKind,
    PointsMaterial, SceneGraph, ShaderMaterial, ShaderProgram, Side, SphereGeometry,
    StandardMaterial, StarfieldGenerator, TextureHandle, Transform,
};

use crate::assets::{TextureLoader, load_or_fallback};
use crate::preview::PreviewScene;

/// Base color of both planet materials (sRGB `#ffa500`).
pub const PLANET_BASE_COLOR: u32 = 0xffa500;

const NEBULA_SEGMENTS: u32 = 32;
const ATMOSPHERE_SEGMENTS: u32 = 64;

/// The main scene plus handles to the nodes the animation driver touches.
#[derive(Debug, Clone)]
pub struct World {
    pub graph: SceneGraph,
    pub stars: NodeId,
    pub nebula: NodeId,
    pub planet_group: NodeId,
    pub planet: NodeId,
    pub atmosphere: NodeId,
    /// `None` when the preview is disabled.
    pub preview: Option<PreviewScene>,
    /// Seed actually used for star placement.
    pub star_seed: u64,
}

/// Builds a [`World`] from configuration and a texture source.
pub struct WorldBuilder<'a> {
    config: &'a Config,
    loader: &'a dyn TextureLoader,
}

impl<'a> WorldBuilder<'a> {
    pub fn new(config: &'a Config, loader: &'a dyn TextureLoader) -> Self {
        Self { config, loader }
    }

    /// Decode both textures in parallel, then assemble the scene graphs.
    ///
    /// Texture failures are absorbed by [`load_or_fallback`]; this never fails.
    #[tracing::instrument(skip_all)]
    pub fn build(&self) -> World {
        let scene = &self.config.scene;
        let base_color = Color::from_hex(PLANET_BASE_COLOR);
        let preview_enabled = self.config.preview.enabled;

        // A white texel leaves the material color untouched when a map is missing.
        let (planet_map, preview_map) = std::thread::scope(|s| {
            let planet =
                s.spawn(|| load_or_fallback(self.loader, &scene.planet_texture, Color::WHITE));
            let preview = preview_enabled.then(|| {
                s.spawn(|| load_or_fallback(self.loader, &scene.preview_texture, Color::WHITE))
            });
            (
                join_texture(planet, &scene.planet_texture, Color::WHITE),
                preview.map(|h| join_texture(h, &scene.preview_texture, Color::WHITE)),
            )
        });

        let star_seed = scene.star_seed.unwrap_or_else(rand::random);
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let cloud = StarfieldGenerator::new(
            star_seed,
            scene.star_count,
            scene.star_inner_radius,
            scene.star_outer_radius,
        )
        .generate();
        let stars = graph.add(
            root,
            Node::new("stars", NodeKind::Decoration).with_renderable(
                Geometry::Points(Arc::new(cloud)),
                Material::Points(PointsMaterial {
                    size: scene.star_size,
                    size_attenuation: scene.star_size_attenuation,
                    ..PointsMaterial::default()
                }),
            ),
        );

        let nebula = graph.add(
            root,
            Node::new("nebula", NodeKind::Decoration).with_renderable(
                Geometry::Sphere(SphereGeometry::new(
                    scene.nebula_radius,
                    NEBULA_SEGMENTS,
                    NEBULA_SEGMENTS,
                )),
                Material::Shader(ShaderMaterial::new(
                    ShaderProgram::Nebula,
                    BlendMode::Normal,
                    Side::Back,
                )),
            ),
        );

        let planet_group = graph.add(root, Node::new("planet-group", NodeKind::Group));
        let planet = graph.add(
            planet_group,
            Node::new("planet", NodeKind::Planet).with_renderable(
                Geometry::Sphere(SphereGeometry::new(
                    scene.planet_radius,
                    scene.planet_segments,
                    scene.planet_segments,
                )),
                Material::Standard(StandardMaterial {
                    color: base_color,
                    map: Some(planet_map),
                }),
            ),
        );
        let atmosphere = graph.add(
            planet_group,
            Node::new("atmosphere", NodeKind::Decoration).with_renderable(
                Geometry::Sphere(SphereGeometry::new(
                    scene.atmosphere_radius,
                    ATMOSPHERE_SEGMENTS,
                    ATMOSPHERE_SEGMENTS,
                )),
                Material::Shader(ShaderMaterial::new(
                    ShaderProgram::Atmosphere,
                    BlendMode::Additive,
                    Side::Back,
                )),
            ),
        );

        add_light(
            &mut graph,
            "sun",
            Light::Directional {
                color: Color::WHITE,
                intensity: 1.5,
            },
            Vec3::new(10.0, 5.0, 5.0),
        );
        add_light(
            &mut graph,
            "ambient",
            Light::Ambient {
                color: Color::from_hex(0x404040),
                intensity: 0.4,
            },
            Vec3::ZERO,
        );
        add_light(
            &mut graph,
            "planet-glow",
            Light::Point {
                color: Color::from_hex(0xff6347),
                intensity: 0.8,
                range: 100.0,
            },
            Vec3::ZERO,
        );

        let preview = preview_map.map(|map| PreviewScene::new(map, self.config.preview.size));

        tracing::info!(
            nodes = graph.len(),
            stars = scene.star_count,
            star_seed,
            preview = preview.is_some(),
            "World built"
        );

        World {
            graph,
            stars,
            nebula,
            planet_group,
            planet,
            atmosphere,
            preview,
            star_seed,
        }
    }
}

pub(crate) fn add_light(graph: &mut SceneGraph, name: &str, light: Light, position: Vec3) -> NodeId {
    let root = graph.root();
    graph.add(
        root,
        Node::new(name, NodeKind::Light(light)).with_transform(Transform::from_position(position)),
    )
}

fn join_texture(
    handle: std::thread::ScopedJoinHandle<'_, TextureHandle>,
    path: &Path,
    fallback: Color,
) -> TextureHandle {
    handle.join().unwrap_or_else(|_| {
        tracing::error!(path = %path.display(), "Texture decode thread panicked");
        Arc::new(ImageData::solid(format!("fallback:{}", path.display()), fallback))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetError;

    /// Serves a 2×2 texture for every path.
    struct CheckerLoader;

    impl TextureLoader for CheckerLoader {
        fn load(&self, path: &Path) -> Result<ImageData, AssetError> {
            Ok(ImageData::from_rgba8(path.display().to_string(), 2, 2, vec![200; 16]).unwrap())
        }
    }

    /// Fails every load.
    struct MissingLoader;

    impl TextureLoader for MissingLoader {
        fn load(&self, path: &Path) -> Result<ImageData, AssetError> {
            Err(AssetError::EmptyImage {
                path: path.to_path_buf(),
            })
        }
    }

    fn seeded_config() -> Config {
        let mut config = Config::default();
        config.scene.star_seed = Some(42);
        config
    }

    #[test]
    fn test_world_contains_expected_nodes() {
        let config = seeded_config();
        let world = WorldBuilder::new(&config, &CheckerLoader).build();
        let g = &world.graph;

        assert_eq!(g.get(world.planet).unwrap().kind, NodeKind::Planet);
        assert_eq!(g.get(world.planet).unwrap().parent(), Some(world.planet_group));
        assert_eq!(g.get(world.atmosphere).unwrap().parent(), Some(world.planet_group));
        assert_eq!(g.get(world.planet_group).unwrap().kind, NodeKind::Group);
        assert_eq!(g.lights().len(), 3);
        assert_eq!(world.star_seed, 42);
    }

    #[test]
    fn test_starfield_has_configured_count() {
        let config = seeded_config();
        let world = WorldBuilder::new(&config, &CheckerLoader).build();
        let stars = world.graph.get(world.stars).unwrap();
        let Some(Geometry::Points(cloud)) = stars.renderable.as_ref().map(|r| &r.geometry) else {
            panic!("stars node has no point cloud");
        };
        assert_eq!(cloud.len(), 10_000);
        for p in &cloud.positions {
            assert!((999.9..=3000.1).contains(&p.length()));
        }
    }

    #[test]
    fn test_stars_attenuate_unless_disabled() {
        let star_material = |config: &Config| {
            let world = WorldBuilder::new(config, &CheckerLoader).build();
            match world.graph.get(world.stars).unwrap().renderable.as_ref().map(|r| &r.material) {
                Some(Material::Points(m)) => *m,
                _ => panic!("stars have no points material"),
            }
        };
        let mut config = seeded_config();
        config.scene.star_count = 10;
        let m = star_material(&config);
        assert!(m.size_attenuation);
        assert_eq!(m.size, 2.0);

        config.scene.star_size_attenuation = false;
        assert!(!star_material(&config).size_attenuation);
    }

    #[test]
    fn test_sphere_parameters() {
        let config = seeded_config();
        let world = WorldBuilder::new(&config, &CheckerLoader).build();
        let sphere = |id: NodeId| match world.graph.get(id).unwrap().renderable.as_ref() {
            Some(r) => match &r.geometry {
                Geometry::Sphere(s) => *s,
                Geometry::Points(_) => panic!("expected sphere"),
            },
            None => panic!("expected renderable"),
        };
        assert_eq!(sphere(world.planet), SphereGeometry::new(2.0, 128, 128));
        assert_eq!(sphere(world.atmosphere), SphereGeometry::new(2.1, 64, 64));
        assert_eq!(sphere(world.nebula), SphereGeometry::new(1500.0, 32, 32));
    }

    #[test]
    fn test_missing_textures_fall_back_to_white_map() {
        let config = seeded_config();
        let world = WorldBuilder::new(&config, &MissingLoader).build();

        let planet = world.graph.get(world.planet).unwrap();
        let Some(Material::Standard(material)) = planet.renderable.as_ref().map(|r| &r.material)
        else {
            panic!("planet has no standard material");
        };
        let map = material.map.as_ref().unwrap();
        assert_eq!((map.width, map.height), (1, 1));
        assert_eq!(map.texel(0, 0), Some([0xff, 0xff, 0xff, 0xff]));
        // Surface shows the base color exactly: color * white texel.
        assert_eq!(material.color, Color::from_hex(PLANET_BASE_COLOR));

        let preview = world.preview.as_ref().unwrap();
        assert_eq!((preview.texture().width, preview.texture().height), (1, 1));
    }

    #[test]
    fn test_preview_can_be_disabled() {
        let mut config = seeded_config();
        config.preview.enabled = false;
        let world = WorldBuilder::new(&config, &CheckerLoader).build();
        assert!(world.preview.is_none());
    }

    #[test]
    fn test_same_seed_same_stars() {
        let config = seeded_config();
        let a = WorldBuilder::new(&config, &CheckerLoader).build();
        let b = WorldBuilder::new(&config, &CheckerLoader).build();
        let points = |w: &World| match &w.graph.get(w.stars).unwrap().renderable.as_ref().unwrap().geometry {
            Geometry::Points(cloud) => cloud.positions.clone(),
            Geometry::Sphere(_) => unreachable!(),
        };
        assert_eq!(points(&a), points(&b));
    }
}
