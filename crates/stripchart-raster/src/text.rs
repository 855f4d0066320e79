//! Text shaping and glyph rasterization for the background layer.
//!
//! Labels are shaped once into positioned glyph coverage tiles and drawn
//! many times; the tick label cache keeps the shaped artifact alive for
//! as long as the tick is visible.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent};
use stripchart_core::geometry::Rect;
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// A font request: family name (None = default sans-serif) and size in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: Option<String>,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: Some(family.into()),
            size,
        }
    }

    /// The default sans-serif family at the given size.
    pub fn sans(size: f32) -> Self {
        Self { family: None, size }
    }
}

/// Shapes strings into reusable [`ShapedText`] artifacts.
pub struct TextShaper {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl TextShaper {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Shape `text` with the given font into glyph tiles plus the
    /// logical bounding box of the laid-out text.
    pub fn shape(&mut self, text: &str, font: &FontSpec) -> ShapedText {
        let metrics = Metrics::new(font.size, font.size * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        let attrs = match &font.family {
            Some(name) => Attrs::new().family(Family::Name(name.as_str())),
            None => Attrs::new().family(Family::SansSerif),
        };
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut tiles = Vec::new();
        let mut max_x = 0.0_f32;
        let mut max_y = 0.0_f32;

        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((0.0, run.line_y), 1.0);

                if let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key)
                {
                    if image.content != SwashContent::Mask {
                        // The tick and label fonts never produce color
                        // glyphs.
                        tracing::warn!("Skipping glyph with {:?} content", image.content);
                    } else if image.placement.width > 0 && image.placement.height > 0 {
                        tiles.push(GlyphTile {
                            x: physical.x + image.placement.left,
                            y: physical.y - image.placement.top,
                            width: image.placement.width,
                            height: image.placement.height,
                            coverage: image.data.clone(),
                        });
                    }
                }

                max_x = max_x.max(physical.x as f32 + glyph.w);
                max_y = max_y.max(run.line_y + run.line_height);
            }
        }

        ShapedText {
            tiles,
            bounds: Rect::new(0.0, 0.0, max_x, max_y),
        }
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

/// One rasterized glyph: a coverage mask positioned in text-layout space.
struct GlyphTile {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

/// A shaped string, ready to be drawn any number of times.
pub struct ShapedText {
    tiles: Vec<GlyphTile>,
    bounds: Rect<f32>,
}

impl ShapedText {
    /// Logical bounding box in text-layout coordinates.
    pub fn bounds(&self) -> Rect<f32> {
        self.bounds
    }

    /// Blend the text into `pixmap`, centered on `(cx, cy)`, tinted with
    /// `color` (straight alpha).
    pub fn draw_centered_at(&self, pixmap: &mut Pixmap, cx: f32, cy: f32, color: tiny_skia::Color) {
        let origin_x = (cx - self.bounds.width / 2.0).round() as i32;
        let origin_y = (cy - self.bounds.height / 2.0).round() as i32;

        let surface_width = pixmap.width() as i32;
        let surface_height = pixmap.height() as i32;
        let pixels = pixmap.pixels_mut();

        for tile in &self.tiles {
            for row in 0..tile.height as i32 {
                let y = origin_y + tile.y + row;
                if y < 0 || y >= surface_height {
                    continue;
                }
                for col in 0..tile.width as i32 {
                    let x = origin_x + tile.x + col;
                    if x < 0 || x >= surface_width {
                        continue;
                    }

                    let coverage =
                        tile.coverage[(row * tile.width as i32 + col) as usize] as f32 / 255.0;
                    if coverage == 0.0 {
                        continue;
                    }

                    let index = (y * surface_width + x) as usize;
                    let dst = pixels[index];

                    // Source-over in premultiplied space.
                    let alpha = color.alpha() * coverage;
                    let inv = 1.0 - alpha;
                    let out_a = alpha + dst.alpha() as f32 / 255.0 * inv;
                    let out_r = color.red() * alpha + dst.red() as f32 / 255.0 * inv;
                    let out_g = color.green() * alpha + dst.green() as f32 / 255.0 * inv;
                    let out_b = color.blue() * alpha + dst.blue() as f32 / 255.0 * inv;

                    let a8 = (out_a * 255.0 + 0.5) as u8;
                    let r8 = ((out_r * 255.0 + 0.5) as u8).min(a8);
                    let g8 = ((out_g * 255.0 + 0.5) as u8).min(a8);
                    let b8 = ((out_b * 255.0 + 0.5) as u8).min(a8);
                    if let Some(blended) = PremultipliedColorU8::from_rgba(r8, g8, b8, a8) {
                        pixels[index] = blended;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaping_produces_tiles_and_bounds() {
        let mut shaper = TextShaper::new();
        let text = shaper.shape("1,234", &FontSpec::sans(30.0));

        assert!(!text.tiles.is_empty());
        assert!(text.bounds().width > 0.0);
        assert!(text.bounds().height > 0.0);
    }

    #[test]
    fn wider_text_has_wider_bounds() {
        let mut shaper = TextShaper::new();
        let font = FontSpec::sans(20.0);
        let short = shaper.shape("1", &font);
        let long = shaper.shape("1,234,567", &font);

        assert!(long.bounds().width > short.bounds().width);
    }

    #[test]
    fn draw_centered_blends_pixels() {
        let mut shaper = TextShaper::new();
        let text = shaper.shape("8", &FontSpec::sans(24.0));

        let mut pixmap = Pixmap::new(64, 64).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        let before: Vec<u8> = pixmap.data().to_vec();

        let color = tiny_skia::Color::from_rgba(0.0, 0.0, 0.4, 1.0).unwrap();
        text.draw_centered_at(&mut pixmap, 32.0, 32.0, color);

        assert_ne!(before, pixmap.data());
    }

    #[test]
    fn empty_string_draws_nothing() {
        let mut shaper = TextShaper::new();
        let text = shaper.shape("", &FontSpec::sans(24.0));

        let mut pixmap = Pixmap::new(16, 16).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        let before: Vec<u8> = pixmap.data().to_vec();

        let color = tiny_skia::Color::from_rgba(0.0, 0.0, 0.4, 1.0).unwrap();
        text.draw_centered_at(&mut pixmap, 8.0, 8.0, color);

        assert_eq!(before, pixmap.data());
    }
}
