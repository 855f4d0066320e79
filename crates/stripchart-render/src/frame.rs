use std::sync::Arc;

use stripchart_winit::window::WinitWindow;

use crate::context::GraphicsContext;

/// Surface texture and view for rendering.
pub struct Surface {
    pub(crate) texture: wgpu::SurfaceTexture,
    pub(crate) view: wgpu::TextureView,
}

impl Surface {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Context for a single frame of rendering.
///
/// Dropping the context submits the recorded commands and presents the
/// frame. Presentation blocks until vertical sync, which is what paces
/// the whole driver loop.
pub struct FrameContext {
    pub(crate) surface: Option<Surface>,
    pub(crate) encoder: Option<wgpu::CommandEncoder>,
    pub(crate) context: Arc<GraphicsContext>,
    pub(crate) window: Arc<WinitWindow>,
}

impl FrameContext {
    pub fn surface(&self) -> &Surface {
        self.surface.as_ref().expect("surface already taken")
    }

    pub fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        self.encoder.as_mut().expect("encoder already taken")
    }

    /// Begin a render pass targeting the surface.
    pub fn begin_pass(&mut self, label: Option<&str>, clear: ClearOp) -> wgpu::RenderPass<'_> {
        let view = &self.surface.as_ref().expect("surface already taken").view;
        let load = match clear {
            ClearOp::Load => wgpu::LoadOp::Load,
            ClearOp::Clear(color) => wgpu::LoadOp::Clear(color),
        };

        self.encoder
            .as_mut()
            .expect("encoder already taken")
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            })
    }

    pub fn graphics_context(&self) -> &Arc<GraphicsContext> {
        &self.context
    }

    pub fn finish(self) {
        drop(self);
    }
}

impl Drop for FrameContext {
    fn drop(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.context.queue.submit(std::iter::once(encoder.finish()));
        }

        if let Some(surface) = self.surface.take() {
            surface.texture.present();
        }

        // Request redraw for next frame
        self.window.request_redraw();
    }
}

/// Clear operation for a render pass.
#[derive(Debug, Clone, Copy)]
pub enum ClearOp {
    /// Load existing contents (no clear).
    Load,
    /// Clear to the specified color.
    Clear(wgpu::Color),
}

impl Default for ClearOp {
    fn default() -> Self {
        ClearOp::Load
    }
}

impl From<wgpu::Color> for ClearOp {
    fn from(color: wgpu::Color) -> Self {
        ClearOp::Clear(color)
    }
}
