//! Draws one [`SceneGraph`] from one camera.
//!
//! GPU resources are created the first time a node is seen and reused for
//! the lifetime of the renderer; each frame only rewrites uniforms. Opaque
//! nodes draw first, then blended ones in graph order.

use std::collections::HashMap;
use std::sync::Arc;

use marsview_scene::{
    Color, Geometry, ImageData, Material, NodeId, PerspectiveCamera, SceneGraph, TextureHandle,
};

use crate::buffer::{BufferAllocator, MeshBuffer, PointBuffer};
use crate::pipelines::{PipelineKey, ScenePipelines};
use crate::texture::{GpuTexture, texture_bind_group};
use crate::uniforms::{CameraUniform, LightsUniform, ObjectUniform};

enum GpuGeometry {
    Mesh(MeshBuffer),
    Points(PointBuffer),
}

struct GpuNode {
    key: PipelineKey,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    material_bind_group: Option<wgpu::BindGroup>,
    geometry: GpuGeometry,
}

/// Per-graph GPU state: frame uniforms, node buffers and uploaded maps.
pub struct SceneRenderer {
    label: &'static str,
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    nodes: HashMap<NodeId, GpuNode>,
    /// Keyed by the address of the shared image.
    textures: HashMap<usize, GpuTexture>,
    /// Stands in for a missing albedo map.
    white: TextureHandle,
    draw_list: Vec<NodeId>,
}

fn texture_key(handle: &TextureHandle) -> usize {
    Arc::as_ptr(handle) as usize
}

fn object_uniform(material: &Material, model: glam::Mat4) -> ObjectUniform {
    match material {
        Material::Standard(m) => {
            let [r, g, b] = m.color.to_array();
            ObjectUniform::new(model, [r, g, b, 1.0], [0.0; 4])
        }
        Material::Points(m) => {
            let attenuate = if m.size_attenuation { 1.0 } else { 0.0 };
            ObjectUniform::new(
                model,
                [1.0, 1.0, 1.0, m.opacity],
                [0.0, m.size, attenuate, 0.0],
            )
        }
        Material::Shader(m) => ObjectUniform::new(model, [1.0; 4], [m.time, 0.0, 0.0, 0.0]),
    }
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, pipelines: &ScenePipelines, label: &'static str) -> Self {
        let alloc = BufferAllocator::new(device);
        let camera_buffer = alloc.create_uniform(
            &format!("{label}-camera"),
            &<CameraUniform as bytemuck::Zeroable>::zeroed(),
        );
        let lights_buffer =
            alloc.create_uniform(&format!("{label}-lights"), &LightsUniform::default());
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-frame-bind-group")),
            layout: &pipelines.frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            label,
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            nodes: HashMap::new(),
            textures: HashMap::new(),
            white: Arc::new(ImageData::solid("white", Color::WHITE)),
            draw_list: Vec::new(),
        }
    }

    /// Upload anything new in `graph` and write this frame's uniforms.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipelines: &mut ScenePipelines,
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        viewport: (u32, u32),
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(camera, viewport.0, viewport.1)),
        );
        queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&LightsUniform::from_lights(&graph.lights())),
        );

        let world = graph.world_matrices();
        let mut opaque = Vec::new();
        let mut blended = Vec::new();

        for (id, node) in graph.iter() {
            let Some(renderable) = &node.renderable else {
                continue;
            };
            if !self.nodes.contains_key(&id) {
                match self.create_node(device, queue, pipelines, &node.name, renderable) {
                    Some(gpu) => {
                        self.nodes.insert(id, gpu);
                    }
                    None => continue,
                }
            }
            let Some(gpu) = self.nodes.get(&id) else {
                continue;
            };

            let uniform = object_uniform(&renderable.material, world[id.index()]);
            queue.write_buffer(&gpu.object_buffer, 0, bytemuck::bytes_of(&uniform));
            pipelines.ensure(device, gpu.key);

            if gpu.key.is_opaque() {
                opaque.push(id);
            } else {
                blended.push(id);
            }
        }

        opaque.extend(blended);
        self.draw_list = opaque;
    }

    /// Record draws for everything prepared this frame.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipelines: &ScenePipelines) {
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for id in &self.draw_list {
            let Some(gpu) = self.nodes.get(id) else {
                continue;
            };
            let Some(pipeline) = pipelines.get(&gpu.key) else {
                continue;
            };
            pass.set_pipeline(pipeline);
            pass.set_bind_group(1, &gpu.object_bind_group, &[]);
            if let Some(material) = &gpu.material_bind_group {
                pass.set_bind_group(2, material, &[]);
            }
            match &gpu.geometry {
                GpuGeometry::Mesh(mesh) => mesh.draw(pass),
                GpuGeometry::Points(points) => points.draw(pass),
            }
        }
    }

    /// Nodes with resident GPU resources.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Draw order of the last prepared frame.
    pub fn draw_list(&self) -> &[NodeId] {
        &self.draw_list
    }

    fn create_node(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipelines: &ScenePipelines,
        name: &str,
        renderable: &marsview_scene::Renderable,
    ) -> Option<GpuNode> {
        let alloc = BufferAllocator::new(device);
        let label = format!("{}-{name}", self.label);
        let key = PipelineKey::for_material(&renderable.material);

        let geometry = match &renderable.geometry {
            Geometry::Sphere(sphere) => GpuGeometry::Mesh(alloc.create_mesh(&label, &sphere.build())),
            Geometry::Points(cloud) => GpuGeometry::Points(alloc.create_points(&label, cloud)),
        };

        let material_bind_group = if key.kind.uses_material_group() {
            let map = match &renderable.material {
                Material::Standard(m) => m.map.clone(),
                _ => None,
            }
            .unwrap_or_else(|| self.white.clone());
            let texture = self.upload(device, queue, pipelines, &map)?;
            Some(texture_bind_group(
                device,
                &format!("{label}-material"),
                &pipelines.material_layout,
                &texture.view,
                &pipelines.map_sampler,
            ))
        } else {
            None
        };

        let object_buffer = alloc.create_uniform(
            &format!("{label}-object"),
            &object_uniform(&renderable.material, glam::Mat4::IDENTITY),
        );
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-object-bind-group")),
            layout: &pipelines.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });

        log::debug!("Created GPU resources for '{label}' ({key:?})");
        Some(GpuNode {
            key,
            object_buffer,
            object_bind_group,
            material_bind_group,
            geometry,
        })
    }

    fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipelines: &ScenePipelines,
        image: &TextureHandle,
    ) -> Option<&GpuTexture> {
        let key = texture_key(image);
        if !self.textures.contains_key(&key) {
            match GpuTexture::from_image(device, queue, &pipelines.blitter, image) {
                Ok(texture) => {
                    self.textures.insert(key, texture);
                }
                Err(err) => {
                    log::warn!("Skipping node, texture '{}' rejected: {err}", image.label);
                    return None;
                }
            }
        }
        self.textures.get(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthBuffer;
    use crate::pass::RenderPassBuilder;
    use crate::test_support::{TEST_FORMAT, create_test_device};
    use glam::Vec3;
    use marsview_scene::{
        BlendMode, Light, Node, NodeKind, PointCloud, PointsMaterial, ShaderMaterial,
        ShaderProgram, Side, SphereGeometry, StandardMaterial, Transform,
    };

    fn sample_graph() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let stars = graph.add(
            root,
            Node::new("stars", NodeKind::Decoration).with_renderable(
                Geometry::Points(Arc::new(PointCloud {
                    positions: vec![Vec3::new(0.0, 0.0, -50.0)],
                    colors: vec![Color::WHITE],
                })),
                Material::Points(PointsMaterial::default()),
            ),
        );
        let glow = graph.add(
            root,
            Node::new("glow", NodeKind::Decoration).with_renderable(
                Geometry::Sphere(SphereGeometry::new(2.1, 16, 16)),
                Material::Shader(ShaderMaterial::new(
                    ShaderProgram::Atmosphere,
                    BlendMode::Additive,
                    Side::Back,
                )),
            ),
        );
        let planet = graph.add(
            root,
            Node::new("planet", NodeKind::Planet).with_renderable(
                Geometry::Sphere(SphereGeometry::new(2.0, 16, 16)),
                Material::Standard(StandardMaterial {
                    color: Color::from_hex(0xffa500),
                    map: None,
                }),
            ),
        );
        graph.add(
            root,
            Node::new(
                "sun",
                NodeKind::Light(Light::Directional {
                    color: Color::WHITE,
                    intensity: 1.5,
                }),
            )
            .with_transform(Transform::from_position(Vec3::new(10.0, 5.0, 5.0))),
        );
        (graph, stars, glow, planet)
    }

    #[test]
    fn test_object_uniform_per_material() {
        let points = object_uniform(
            &Material::Points(PointsMaterial::default()),
            glam::Mat4::IDENTITY,
        );
        assert_eq!(points.color[3], 0.8);
        assert_eq!(points.params[1], 2.0);
        assert_eq!(points.params[2], 1.0);

        let fixed = object_uniform(
            &Material::Points(PointsMaterial {
                size_attenuation: false,
                ..PointsMaterial::default()
            }),
            glam::Mat4::IDENTITY,
        );
        assert_eq!(fixed.params[2], 0.0);

        let mut shader = ShaderMaterial::new(ShaderProgram::Nebula, BlendMode::Normal, Side::Back);
        shader.time = 4.5;
        let u = object_uniform(&Material::Shader(shader), glam::Mat4::IDENTITY);
        assert_eq!(u.params[0], 4.5);
    }

    #[test]
    fn test_prepare_orders_opaque_first_and_draws() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut pipelines = ScenePipelines::new(&device, TEST_FORMAT);
        let mut renderer = SceneRenderer::new(&device, &pipelines, "test");
        let (graph, stars, glow, planet) = sample_graph();
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0)
            .with_position(Vec3::new(0.0, 0.0, 8.0));

        renderer.prepare(&device, &queue, &mut pipelines, &graph, &camera, (64, 64));
        assert_eq!(renderer.node_count(), 3);
        assert_eq!(renderer.draw_list(), &[planet, stars, glow]);

        // A second frame reuses the cached resources.
        renderer.prepare(&device, &queue, &mut pipelines, &graph, &camera, (64, 64));
        assert_eq!(renderer.node_count(), 3);

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test-target"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEST_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = DepthBuffer::new(&device, "test-depth", 64, 64);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test-encoder"),
        });
        {
            let mut pass = RenderPassBuilder::new().begin(&mut encoder, &view, Some(&depth.view));
            renderer.draw(&mut pass, &pipelines);
        }
        queue.submit(std::iter::once(encoder.finish()));
    }
}
