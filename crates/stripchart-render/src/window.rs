use std::sync::Arc;

use stripchart_winit::window::{PhysicalSize, Window, WindowBackend};

use crate::{
    context::GraphicsContext,
    error::{GraphicsError, GraphicsResult},
    frame::{FrameContext, Surface},
};

/// Descriptor for configuring a window's rendering context.
pub struct WindowContextDescriptor {
    /// The surface texture format. If None, uses the default format for the surface.
    pub format: Option<wgpu::TextureFormat>,
    /// Present mode for the surface. Defaults to vsync, which paces the
    /// frame loop: presenting blocks until the vertical blank.
    pub present_mode: Option<wgpu::PresentMode>,
    /// Alpha mode for the surface.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
}

impl Default for WindowContextDescriptor {
    fn default() -> Self {
        Self {
            format: None,
            present_mode: None,
            alpha_mode: None,
        }
    }
}

pub struct PendingReconfigure {
    pub resize: Option<PhysicalSize<u32>>,
}

impl PendingReconfigure {
    const fn new() -> Self {
        Self { resize: None }
    }
}

/// Window rendering context that manages a surface and its configuration.
///
/// Resizes are deferred: the compositor records the new size with
/// [`WindowContext::resized`] and the surface is reconfigured at the top
/// of the next frame, before anything is rasterized into it.
pub struct WindowContext {
    pub(crate) window: Window,
    pub(crate) context: Arc<GraphicsContext>,
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) config: wgpu::SurfaceConfiguration,
    pub(crate) reconfigure: PendingReconfigure,
}

impl WindowContext {
    pub fn new(
        window: Window,
        context: Arc<GraphicsContext>,
        descriptor: WindowContextDescriptor,
    ) -> GraphicsResult<Self> {
        let PhysicalSize { width, height } = window.window.inner_size();
        let surface = context.instance.create_surface(window.window.clone())?;

        let mut config = surface
            .get_default_config(&context.adapter, width.max(1), height.max(1))
            .ok_or(GraphicsError::SurfaceConfig)?;

        if let Some(format) = descriptor.format {
            config.format = format;
        }
        config.present_mode = descriptor
            .present_mode
            .unwrap_or(wgpu::PresentMode::AutoVsync);
        if let Some(alpha_mode) = descriptor.alpha_mode {
            config.alpha_mode = alpha_mode;
        }

        surface.configure(&context.device, &config);

        tracing::info!(
            "Configured surface {}x{} ({:?}, {:?})",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            window,
            surface,
            config,
            reconfigure: PendingReconfigure::new(),
            context,
        })
    }

    /// Record a window resize, applied at the start of the next frame.
    pub fn resized(&mut self, new_size: PhysicalSize<u32>) {
        self.reconfigure.resize = Some(new_size);
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn graphics_context(&self) -> &Arc<GraphicsContext> {
        &self.context
    }

    pub fn surface(&self) -> &wgpu::Surface<'static> {
        &self.surface
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn surface_config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }
}

impl WindowBackend for WindowContext {
    type FrameContext = FrameContext;

    fn begin_drawing(&mut self) -> Self::FrameContext {
        if let Some(new_size) = self.reconfigure.resize.take() {
            self.config.width = new_size.width.max(1);
            self.config.height = new_size.height.max(1);
            self.surface.configure(&self.context.device, &self.config);
        }

        // A surface fault here means the GPU state is already corrupted;
        // there is no partial-frame recovery.
        let frame = self
            .surface
            .get_current_texture()
            .expect("failed to acquire surface texture");
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        FrameContext {
            surface: Some(Surface {
                texture: frame,
                view,
            }),
            encoder: Some(encoder),
            context: self.context.clone(),
            window: self.window.window.clone(),
        }
    }
}
