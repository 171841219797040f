//! Declarative render pass setup.

use crate::depth::DepthBuffer;

/// Background behind the starfield.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color::BLACK;

/// Transparent clear for targets composited over another frame.
pub const TRANSPARENT: wgpu::Color = wgpu::Color::TRANSPARENT;

/// Fluent builder for a single color (+ optional depth) render pass.
#[derive(Debug, Clone)]
pub struct RenderPassBuilder {
    /// `None` keeps the existing contents of the color target.
    clear_color: Option<wgpu::Color>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    pub fn new() -> Self {
        Self {
            clear_color: Some(SPACE_BLACK),
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = Some(color);
        self
    }

    /// Draw over what is already in the color target.
    pub fn preserve_color(mut self) -> Self {
        self.clear_color = None;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn color_load(&self) -> wgpu::LoadOp<wgpu::Color> {
        match self.clear_color {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        }
    }

    /// Depth always starts at the reverse-Z far plane.
    fn depth_load(&self) -> wgpu::LoadOp<f32> {
        wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE)
    }

    /// Begin the pass on `color`, attaching `depth` when given.
    pub fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color: &wgpu::TextureView,
        depth: Option<&wgpu::TextureView>,
    ) -> wgpu::RenderPass<'e> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: self.color_load(),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };
        let depth_stencil_attachment = depth.map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: self.depth_load(),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
