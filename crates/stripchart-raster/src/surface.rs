//! The CPU pixel buffer the background layer is rasterized into.

use stripchart_core::geometry::Size;
use tiny_skia::Pixmap;

use crate::error::{RasterError, RasterResult};

/// Bytes per pixel (premultiplied RGBA, 32 bits).
pub const PIXEL_SIZE: u32 = 4;

/// A pixel buffer paired with the vector-drawing context bound to it.
///
/// The surface is reallocated, never resized in place, whenever the
/// display size changes: the rasterizer requires a fixed-stride buffer
/// matched to its own layout, which is validated once at allocation.
pub struct RasterSurface {
    pixmap: Pixmap,
    stride_bytes: u32,
}

impl RasterSurface {
    pub fn new(size: Size<u32>) -> RasterResult<Self> {
        let Size { width, height } = size;

        // Row size must stay within the rasterizer's coordinate range.
        if width == 0 || width > i32::MAX as u32 / PIXEL_SIZE {
            return Err(RasterError::UnsupportedWidth(width));
        }

        let pixmap =
            Pixmap::new(width, height).ok_or(RasterError::AllocationFailed { width, height })?;

        // Validate the stride the rasterizer actually allocated.
        let stride_bytes = (pixmap.data().len() / height as usize) as u32;
        if stride_bytes % PIXEL_SIZE != 0 || stride_bytes < width * PIXEL_SIZE {
            return Err(RasterError::StrideContract {
                stride_bytes,
                width,
            });
        }

        let mut surface = Self {
            pixmap,
            stride_bytes,
        };
        surface.clear();
        Ok(surface)
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.pixmap.width(), self.pixmap.height())
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Row stride in bytes, as required for the GPU upload.
    pub fn stride_bytes(&self) -> u32 {
        self.stride_bytes
    }

    /// Reset the surface to the background color.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::WHITE);
    }

    /// Raw premultiplied RGBA pixels, `height` rows of `stride_bytes`.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_width_is_tightly_packed() {
        let surface = RasterSurface::new(Size::new(640, 480)).unwrap();
        assert_eq!(surface.stride_bytes(), 640 * PIXEL_SIZE);
        assert_eq!(surface.data().len(), 640 * 480 * PIXEL_SIZE as usize);
    }

    #[test]
    fn zero_width_is_rejected() {
        assert!(matches!(
            RasterSurface::new(Size::new(0, 480)),
            Err(RasterError::UnsupportedWidth(0))
        ));
    }

    #[test]
    fn zero_height_fails_allocation() {
        assert!(matches!(
            RasterSurface::new(Size::new(640, 0)),
            Err(RasterError::AllocationFailed {
                width: 640,
                height: 0
            })
        ));
    }

    #[test]
    fn oversized_width_is_rejected() {
        let width = i32::MAX as u32;
        assert!(matches!(
            RasterSurface::new(Size::new(width, 1)),
            Err(RasterError::UnsupportedWidth(w)) if w == width
        ));
    }

    #[test]
    fn clear_resets_to_background() {
        let mut surface = RasterSurface::new(Size::new(4, 4)).unwrap();
        surface.pixmap_mut().fill(tiny_skia::Color::BLACK);
        surface.clear();
        assert!(surface.data().iter().all(|&byte| byte == 0xff));
    }

    #[test]
    fn reallocation_reproduces_identical_pixels() {
        let first = RasterSurface::new(Size::new(32, 16)).unwrap();
        let resized = RasterSurface::new(Size::new(64, 64)).unwrap();
        let back = RasterSurface::new(Size::new(32, 16)).unwrap();

        drop(resized);
        assert_eq!(first.data(), back.data());
    }
}
