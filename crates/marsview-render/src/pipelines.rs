//! Render pipelines for every material variant, built on first use.
//!
//! A pipeline is identified by a [`PipelineKey`]: which shader program runs,
//! how it blends, and which faces it culls. Opaque keys write depth; blended
//! keys only test against it.

use std::collections::HashMap;

use glam::Vec3;
use marsview_scene::{BlendMode, Material, ShaderProgram, Side, shading};

use crate::buffer::{MeshVertex, PointInstance};
use crate::depth::DepthBuffer;
use crate::texture::{Blitter, create_map_sampler, texture_bind_group_layout};

const COMMON_WGSL: &str = include_str!("shaders/common.wgsl");

fn wgsl_vec3(v: Vec3) -> String {
    format!("vec3<f32>({:?}, {:?}, {:?})", v.x, v.y, v.z)
}

/// Module-scope WGSL `const` declarations for the procedural materials.
fn shading_prelude() -> String {
    let vec3s = [
        ("NEBULA_COLOR_A", shading::NEBULA_COLOR_A),
        ("NEBULA_COLOR_B", shading::NEBULA_COLOR_B),
        ("NEBULA_COLOR_C", shading::NEBULA_COLOR_C),
        ("NEBULA_DRIFT", shading::NEBULA_DRIFT),
        ("ATMOSPHERE_COLOR", shading::ATMOSPHERE_COLOR),
    ];
    let scalars = [
        ("NEBULA_ALPHA", shading::NEBULA_ALPHA),
        ("NEBULA_FREQUENCY", shading::NEBULA_FREQUENCY),
        ("ATMOSPHERE_RIM_BIAS", shading::ATMOSPHERE_RIM_BIAS),
        ("ATMOSPHERE_ALPHA_SCALE", shading::ATMOSPHERE_ALPHA_SCALE),
    ];

    let mut out = String::new();
    for (name, v) in vec3s {
        out.push_str(&format!("const {name}: vec3<f32> = {};\n", wgsl_vec3(v)));
    }
    for (name, x) in scalars {
        out.push_str(&format!("const {name}: f32 = {x:?};\n"));
    }
    out
}

/// Shader program family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Standard,
    Points,
    Nebula,
    Atmosphere,
}

impl PipelineKind {
    fn source(self) -> &'static str {
        match self {
            PipelineKind::Standard => include_str!("shaders/standard.wgsl"),
            PipelineKind::Points => include_str!("shaders/points.wgsl"),
            PipelineKind::Nebula => include_str!("shaders/nebula.wgsl"),
            PipelineKind::Atmosphere => include_str!("shaders/atmosphere.wgsl"),
        }
    }

    /// Complete WGSL for this kind: shared bindings, generated constants, then
    /// the program itself.
    fn full_source(self) -> String {
        format!("{COMMON_WGSL}\n{}\n{}", shading_prelude(), self.source())
    }

    fn label(self) -> &'static str {
        match self {
            PipelineKind::Standard => "standard",
            PipelineKind::Points => "points",
            PipelineKind::Nebula => "nebula",
            PipelineKind::Atmosphere => "atmosphere",
        }
    }

    /// Whether group 2 (albedo map + sampler) is bound.
    pub fn uses_material_group(self) -> bool {
        self == PipelineKind::Standard
    }
}

/// Fixed-function state selected by a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub kind: PipelineKind,
    /// `None` is opaque.
    pub blend: Option<BlendMode>,
    /// Faces that are drawn; `None` disables culling.
    pub side: Option<Side>,
}

impl PipelineKey {
    pub fn for_material(material: &Material) -> Self {
        let (kind, blend) = match material {
            Material::Standard(_) => (PipelineKind::Standard, None),
            Material::Points(_) => (PipelineKind::Points, Some(BlendMode::Normal)),
            Material::Shader(m) => (
                match m.program {
                    ShaderProgram::Nebula => PipelineKind::Nebula,
                    ShaderProgram::Atmosphere => PipelineKind::Atmosphere,
                },
                Some(m.blend),
            ),
        };
        Self {
            kind,
            blend,
            side: material.side(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.blend.is_none()
    }

    fn cull_mode(&self) -> Option<wgpu::Face> {
        match self.side {
            Some(Side::Front) => Some(wgpu::Face::Back),
            Some(Side::Back) => Some(wgpu::Face::Front),
            None => None,
        }
    }

    fn blend_state(&self) -> Option<wgpu::BlendState> {
        self.blend.map(blend_state)
    }
}

pub(crate) fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    match mode {
        BlendMode::Normal => wgpu::BlendState::ALPHA_BLENDING,
        BlendMode::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::Zero,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
    }
}

/// Bind group layouts, samplers, shader modules and the pipeline cache for
/// one color target format.
pub struct ScenePipelines {
    pub format: wgpu::TextureFormat,
    /// Group 0: camera + lights.
    pub frame_layout: wgpu::BindGroupLayout,
    /// Group 1: per-node object uniform.
    pub object_layout: wgpu::BindGroupLayout,
    /// Group 2: albedo map + sampler.
    pub material_layout: wgpu::BindGroupLayout,
    pub map_sampler: wgpu::Sampler,
    pub blitter: Blitter,
    textured_layout: wgpu::PipelineLayout,
    untextured_layout: wgpu::PipelineLayout,
    modules: HashMap<PipelineKind, wgpu::ShaderModule>,
    cache: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl ScenePipelines {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bind-group-layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-group-layout"),
            entries: &[uniform_entry(0)],
        });
        let material_layout = texture_bind_group_layout(device, "material-bind-group-layout");

        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("textured-pipeline-layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, &material_layout],
            immediate_size: 0,
        });
        let untextured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("untextured-pipeline-layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            immediate_size: 0,
        });

        Self {
            format,
            frame_layout,
            object_layout,
            material_layout,
            map_sampler: create_map_sampler(device),
            blitter: Blitter::new(device),
            textured_layout,
            untextured_layout,
            modules: HashMap::new(),
            cache: HashMap::new(),
        }
    }

    /// Build the pipeline for `key` if it does not exist yet.
    pub fn ensure(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.cache.contains_key(&key) {
            return;
        }
        let module = self.modules.entry(key.kind).or_insert_with(|| {
            let source = key.kind.full_source();
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{}-shader", key.kind.label())),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        });

        let layout = if key.kind.uses_material_group() {
            &self.textured_layout
        } else {
            &self.untextured_layout
        };
        let vertex_layout = match key.kind {
            PipelineKind::Points => PointInstance::layout(),
            _ => MeshVertex::layout(),
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{}-pipeline", key.kind.label())),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: key.blend_state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: key.cull_mode(),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::stencil_state(key.is_opaque())),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("Built pipeline {key:?}");
        self.cache.insert(key, pipeline);
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.cache.get(key)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TEST_FORMAT, create_test_device};
    use marsview_scene::{Color, PointsMaterial, ShaderMaterial, StandardMaterial};

    fn atmosphere() -> Material {
        Material::Shader(ShaderMaterial::new(
            ShaderProgram::Atmosphere,
            BlendMode::Additive,
            Side::Back,
        ))
    }

    #[test]
    fn test_shading_prelude_carries_constants() {
        let prelude = shading_prelude();
        assert!(prelude.contains("const NEBULA_COLOR_A: vec3<f32> = vec3<f32>(0.1, 0.0, 0.3);"));
        assert!(prelude.contains("const NEBULA_COLOR_C: vec3<f32> = vec3<f32>(0.0, 0.1, 0.4);"));
        assert!(prelude.contains("const NEBULA_ALPHA: f32 = 0.3;"));
        assert!(prelude.contains("const NEBULA_FREQUENCY: f32 = 0.01;"));
        assert!(prelude.contains("const ATMOSPHERE_COLOR: vec3<f32> = vec3<f32>(1.0, 0.3, 0.2);"));
        assert!(prelude.contains("const ATMOSPHERE_ALPHA_SCALE: f32 = 0.3;"));
    }

    #[test]
    fn test_procedural_shaders_use_generated_constants() {
        for name in ["NEBULA_COLOR_A", "NEBULA_COLOR_B", "NEBULA_COLOR_C", "NEBULA_ALPHA"] {
            assert!(PipelineKind::Nebula.source().contains(name), "nebula lacks {name}");
        }
        for name in ["ATMOSPHERE_COLOR", "ATMOSPHERE_RIM_BIAS", "ATMOSPHERE_ALPHA_SCALE"] {
            assert!(PipelineKind::Atmosphere.source().contains(name), "atmosphere lacks {name}");
        }
        // No literal copies of the colors left behind.
        assert!(!PipelineKind::Nebula.source().contains("0.1, 0.0, 0.3"));
        assert!(!PipelineKind::Atmosphere.source().contains("1.0, 0.3, 0.2"));
    }

    #[test]
    fn test_full_source_places_prelude_before_program() {
        let full = PipelineKind::Atmosphere.full_source();
        let decl = full.find("const ATMOSPHERE_COLOR").unwrap();
        let usage = full.find("srgb_to_linear(ATMOSPHERE_COLOR)").unwrap();
        assert!(decl < usage);
    }

    #[test]
    fn test_standard_key_is_opaque_front() {
        let key = PipelineKey::for_material(&Material::Standard(StandardMaterial {
            color: Color::WHITE,
            map: None,
        }));
        assert_eq!(key.kind, PipelineKind::Standard);
        assert!(key.is_opaque());
        assert_eq!(key.cull_mode(), Some(wgpu::Face::Back));
    }

    #[test]
    fn test_back_side_culls_front_faces() {
        let key = PipelineKey::for_material(&atmosphere());
        assert_eq!(key.kind, PipelineKind::Atmosphere);
        assert_eq!(key.cull_mode(), Some(wgpu::Face::Front));
        assert!(!key.is_opaque());
    }

    #[test]
    fn test_points_do_not_cull() {
        let key = PipelineKey::for_material(&Material::Points(PointsMaterial::default()));
        assert_eq!(key.cull_mode(), None);
        assert_eq!(key.blend, Some(BlendMode::Normal));
    }

    #[test]
    fn test_additive_blend_factors() {
        let state = blend_state(BlendMode::Additive);
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend_state(BlendMode::Normal), wgpu::BlendState::ALPHA_BLENDING);
    }

    #[test]
    fn test_shaders_compile_and_pipelines_cache() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mut pipelines = ScenePipelines::new(&device, TEST_FORMAT);
        let materials = [
            Material::Standard(StandardMaterial {
                color: Color::WHITE,
                map: None,
            }),
            Material::Points(PointsMaterial::default()),
            Material::Shader(ShaderMaterial::new(
                ShaderProgram::Nebula,
                BlendMode::Normal,
                Side::Back,
            )),
            atmosphere(),
        ];
        for material in &materials {
            let key = PipelineKey::for_material(material);
            pipelines.ensure(&device, key);
            pipelines.ensure(&device, key);
            assert!(pipelines.get(&key).is_some());
        }
        assert_eq!(pipelines.cached_count(), 4);
    }
}
