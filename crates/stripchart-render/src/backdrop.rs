//! CPU-to-GPU upload of the rasterized background layer.

use crate::context::GraphicsContext;

/// GPU texture mirroring the CPU raster surface.
///
/// The compositor uploads the freshly rasterized grid/label image into
/// this texture every frame, then blits it as a full-surface quad. The
/// texture always has exactly the dimensions of the raster surface; it
/// is resized in lockstep when the surface is reallocated.
pub struct BackdropTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl BackdropTexture {
    /// Texture format matching the raster surface's premultiplied RGBA
    /// pixels. The raster stage produces sRGB-encoded bytes, so the
    /// sRGB view keeps the blit color-correct on an sRGB surface.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(context: &GraphicsContext, width: u32, height: u32) -> Self {
        let (texture, view) = Self::create(context.device(), width, height);

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    fn create(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Backdrop Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Resize to match a reallocated raster surface.
    ///
    /// The old texture is destroyed before the replacement is allocated,
    /// so the two never alias.
    pub fn resize(&mut self, context: &GraphicsContext, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }

        tracing::info!(
            "Resizing backdrop texture {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );

        self.texture.destroy();
        let (texture, view) = Self::create(context.device(), width, height);
        self.texture = texture;
        self.view = view;
        self.width = width;
        self.height = height;
    }

    /// Upload raster pixels.
    ///
    /// `data` must hold `height` rows of `bytes_per_row` bytes in the
    /// texture's format.
    pub fn upload(&self, context: &GraphicsContext, data: &[u8], bytes_per_row: u32) {
        context.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Get the texture view for blitting.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Get the texture dimensions.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
