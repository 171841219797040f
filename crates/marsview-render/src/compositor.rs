//! Pastes the offscreen preview into a corner of the frame.

use crate::pipelines::ScenePipelines;
use crate::texture::{RenderTarget, texture_bind_group};

/// Gap between the preview and the window edges, in pixels.
pub const PREVIEW_MARGIN: u32 = 16;

/// Bottom-right placement `[x, y, width, height]` of a square preview of
/// `size` pixels inside a `surface` of `(width, height)`.
///
/// The preview shrinks to fit small windows and is omitted when nothing
/// would remain visible.
pub fn preview_viewport(surface: (u32, u32), size: u32, margin: u32) -> Option<[f32; 4]> {
    let (width, height) = surface;
    let available = width.min(height).saturating_sub(2 * margin);
    let edge = size.min(available);
    if edge == 0 {
        return None;
    }
    let x = width - margin - edge;
    let y = height - margin - edge;
    Some([x as f32, y as f32, edge as f32, edge as f32])
}

/// Alpha-blended blit of a [`RenderTarget`] onto the surface.
pub struct PreviewCompositor {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl PreviewCompositor {
    pub fn new(
        device: &wgpu::Device,
        pipelines: &ScenePipelines,
        target: &RenderTarget,
    ) -> Self {
        let blitter = &pipelines.blitter;
        let pipeline = blitter.pipeline(
            device,
            "preview-composite-pipeline",
            pipelines.format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        let bind_group = texture_bind_group(
            device,
            "preview-composite-bind-group",
            &blitter.bind_group_layout,
            &target.view,
            &blitter.sampler,
        );
        Self {
            pipeline,
            bind_group,
        }
    }

    /// Draw into `rect` (from [`preview_viewport`]) of the current pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, rect: [f32; 4]) {
        let [x, y, w, h] = rect;
        pass.set_viewport(x, y, w, h, 0.0, 1.0);
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
