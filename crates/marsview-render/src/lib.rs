//! wgpu rendering for the Mars viewer: device and surface management, the
//! scene pipelines, per-graph GPU caches, and the preview compositor.

pub mod buffer;
pub mod compositor;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipelines;
pub mod renderer;
pub mod scene_renderer;
pub mod texture;
pub mod uniforms;

pub use buffer::{BufferAllocator, MeshBuffer, MeshVertex, PointBuffer, PointInstance};
pub use compositor::{PREVIEW_MARGIN, PreviewCompositor, preview_viewport};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{RenderPassBuilder, SPACE_BLACK, TRANSPARENT};
pub use pipelines::{PipelineKey, PipelineKind, ScenePipelines};
pub use renderer::{Renderer, SceneView};
pub use scene_renderer::SceneRenderer;
pub use texture::{Blitter, GpuTexture, RenderTarget, TextureError};
pub use uniforms::{CameraUniform, LightsUniform, ObjectUniform};

#[cfg(test)]
pub(crate) mod test_support;
