//! Frame orchestration: main scene, preview target, composite, present.

use marsview_scene::{PerspectiveCamera, SceneGraph};

use crate::compositor::{PREVIEW_MARGIN, PreviewCompositor, preview_viewport};
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{RenderPassBuilder, SPACE_BLACK, TRANSPARENT};
use crate::pipelines::ScenePipelines;
use crate::scene_renderer::SceneRenderer;
use crate::texture::RenderTarget;

/// A graph and the camera to draw it from.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    pub graph: &'a SceneGraph,
    pub camera: &'a PerspectiveCamera,
}

struct PreviewPass {
    target: RenderTarget,
    scene: SceneRenderer,
    compositor: PreviewCompositor,
}

/// Owns the GPU context and everything needed to draw a frame.
pub struct Renderer {
    context: RenderContext,
    depth: DepthBuffer,
    pipelines: ScenePipelines,
    main: SceneRenderer,
    preview: Option<PreviewPass>,
}

impl Renderer {
    /// `preview_size` of `None` disables the preview target.
    pub fn new(context: RenderContext, preview_size: Option<u32>) -> Self {
        let device = &context.device;
        let (width, height) = context.size();
        let depth = DepthBuffer::new(device, "depth-buffer", width, height);
        let pipelines = ScenePipelines::new(device, context.surface_format);
        let main = SceneRenderer::new(device, &pipelines, "main");

        let preview = preview_size.map(|size| {
            let target = RenderTarget::new(device, context.surface_format, size);
            let compositor = PreviewCompositor::new(device, &pipelines, &target);
            PreviewPass {
                scene: SceneRenderer::new(device, &pipelines, "preview"),
                target,
                compositor,
            }
        });

        log::info!(
            "Renderer ready: {width}x{height}, preview {}",
            preview_size.map_or_else(|| "off".to_string(), |s| format!("{s}px"))
        );

        Self {
            context,
            depth,
            pipelines,
            main,
            preview,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        let (width, height) = self.context.size();
        self.depth.resize(&self.context.device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    /// Draw `main` to the surface, then `preview` (if enabled) into its own
    /// target composited over the bottom-right corner, and present.
    ///
    /// [`SurfaceError::Timeout`] means the frame was skipped; the caller
    /// decides whether other errors are fatal.
    pub fn render(
        &mut self,
        main: SceneView<'_>,
        preview: Option<SceneView<'_>>,
    ) -> Result<(), SurfaceError> {
        let frame = self.context.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let surface_size = self.context.size();
        let device = &self.context.device;
        let queue = &self.context.queue;

        self.main.prepare(
            device,
            queue,
            &mut self.pipelines,
            main.graph,
            main.camera,
            surface_size,
        );
        let preview = match (self.preview.as_mut(), preview) {
            (Some(pass), Some(scene)) => {
                let size = pass.target.size;
                pass.scene
                    .prepare(device, queue, &mut self.pipelines, scene.graph, scene.camera, (size, size));
                Some(&*pass)
            }
            _ => None,
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        {
            let mut pass = RenderPassBuilder::new()
                .clear_color(SPACE_BLACK)
                .label("main-pass")
                .begin(&mut encoder, &view, Some(&self.depth.view));
            self.main.draw(&mut pass, &self.pipelines);
        }

        if let Some(preview) = preview {
            {
                let mut pass = RenderPassBuilder::new()
                    .clear_color(TRANSPARENT)
                    .label("preview-pass")
                    .begin(&mut encoder, &preview.target.view, Some(&preview.target.depth.view));
                preview.scene.draw(&mut pass, &self.pipelines);
            }
            if let Some(rect) = preview_viewport(surface_size, preview.target.size, PREVIEW_MARGIN) {
                let mut pass = RenderPassBuilder::new()
                    .preserve_color()
                    .label("preview-composite-pass")
                    .begin(&mut encoder, &view, None);
                preview.compositor.draw(&mut pass, rect);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
