//! The frame compositor and viewport manager.
//!
//! Static content (grid, tick labels, axis title) is rasterized on the
//! CPU, uploaded to a backdrop texture and blitted; the data curve is
//! expanded into GPU geometry and drawn on top in the same pass. Both
//! stages share one raster surface and one texture, so the steps of
//! [`Graph::blocking_draw`] run strictly in order.

use glam::Vec2;
use stripchart_core::geometry::Size;
use stripchart_raster::{FontSpec, RasterError, RasterSurface, ShapedText, TextShaper};
use stripchart_render::{
    BackdropTexture, BlitRenderer, ClearOp, GraphicsError, OverlayRenderer, WindowContext,
    expand_polyline,
};
use stripchart_winit::window::{PhysicalSize, WindowBackend};
use tiny_skia::{Paint, PathBuilder, Stroke, Transform};

use crate::data::{DataWindow, Sample};
use crate::range::VerticalRange;
use crate::ticks::TickLabelCache;

/// Configuration for a graph window.
pub struct GraphDescriptor {
    /// Window title.
    pub title: String,
    /// Axis title drawn under the tick labels.
    pub axis_label: String,
    /// Initial window size in pixels.
    pub initial_size: Size<u32>,
    /// Width of the visible time span, in sample-time units.
    pub window_width: f32,
    /// Font for the tick labels.
    pub tick_font: FontSpec,
    /// Font for the axis title.
    pub label_font: FontSpec,
    /// Straight-alpha RGBA color of the data curve.
    pub curve_color: [f32; 4],
    /// On-screen width of the data curve in pixels.
    pub curve_width: f32,
}

impl Default for GraphDescriptor {
    fn default() -> Self {
        Self {
            title: "stripchart".to_string(),
            axis_label: "time (s)".to_string(),
            initial_size: Size::new(1024, 768),
            window_width: 10.0,
            tick_font: FontSpec::sans(30.0),
            label_font: FontSpec::sans(20.0),
            curve_color: [1.0, 0.38, 0.0, 0.75],
            curve_width: 5.0,
        }
    }
}

impl GraphDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn axis_label(mut self, label: impl Into<String>) -> Self {
        self.axis_label = label.into();
        self
    }

    pub fn window_width(mut self, width: f32) -> Self {
        self.window_width = width;
        self
    }

    pub fn initial_size(mut self, width: u32, height: u32) -> Self {
        self.initial_size = Size::new(width, height);
        self
    }
}

/// Errors that abort the frame loop.
#[derive(Debug)]
pub enum GraphError {
    /// The raster surface could not be (re)allocated.
    Raster(RasterError),
    /// A GPU resource could not be acquired.
    Graphics(GraphicsError),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::Raster(err) => write!(f, "raster surface error: {}", err),
            GraphError::Graphics(err) => write!(f, "graphics error: {}", err),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Raster(err) => Some(err),
            GraphError::Graphics(err) => Some(err),
        }
    }
}

impl From<RasterError> for GraphError {
    fn from(err: RasterError) -> Self {
        GraphError::Raster(err)
    }
}

impl From<GraphicsError> for GraphError {
    fn from(err: GraphicsError) -> Self {
        GraphError::Graphics(err)
    }
}

/// A scrolling time-series graph bound to one window.
pub struct Graph {
    window: WindowContext,
    raster: RasterSurface,
    backdrop: BackdropTexture,
    blit: BlitRenderer,
    overlay: OverlayRenderer,
    shaper: TextShaper,
    tick_font: FontSpec,
    axis_title: ShapedText,
    ticks: TickLabelCache,
    data: DataWindow,
    range: VerticalRange,
    curve_color: [f32; 4],
    curve_width: f32,
    /// Screen-space curve points, reused across frames.
    points: Vec<Vec2>,
}

impl Graph {
    pub fn new(window: WindowContext, descriptor: &GraphDescriptor) -> Result<Self, GraphError> {
        let context = window.graphics_context().clone();

        let size = window.window().physical_size();
        let size = Size::new(size.width.max(1), size.height.max(1));
        let raster = RasterSurface::new(size)?;
        let backdrop = BackdropTexture::new(&context, size.width, size.height);
        let blit = BlitRenderer::new(context.clone(), window.surface_format());
        let overlay = OverlayRenderer::new(context, window.surface_format());

        let mut shaper = TextShaper::new();
        let axis_title = shaper.shape(&descriptor.axis_label, &descriptor.label_font);

        Ok(Self {
            window,
            raster,
            backdrop,
            blit,
            overlay,
            shaper,
            tick_font: descriptor.tick_font.clone(),
            axis_title,
            ticks: TickLabelCache::new(),
            data: DataWindow::new(),
            range: VerticalRange::default(),
            curve_color: descriptor.curve_color,
            curve_width: descriptor.curve_width,
            points: Vec::new(),
        })
    }

    /// Append a sample; time must be non-decreasing.
    pub fn push_sample(&mut self, time: f32, value: f32) {
        self.data.push(Sample::new(time, value));
    }

    /// Evict samples and tick labels that scrolled out of the window.
    pub fn set_window(&mut self, current_time: f32, window_width: f32) {
        self.data.evict_before(current_time, window_width);
        self.ticks.evict_before(current_time, window_width);
    }

    /// One auto-range step. A no-op while the window is empty.
    pub fn update_range(&mut self) {
        if let Some(extremes) = self.data.extremes() {
            self.range = self.range.updated(extremes);
        }
    }

    pub fn range(&self) -> VerticalRange {
        self.range
    }

    pub fn data(&self) -> &DataWindow {
        &self.data
    }

    /// Render and present one frame.
    ///
    /// Blocks on vertical sync when the frame is presented, pacing the
    /// caller's loop.
    pub fn blocking_draw(&mut self, current_time: f32, window_width: f32) -> Result<(), GraphError> {
        let context = self.window.graphics_context().clone();

        // Resolve any resize before rasterizing: the raster surface, the
        // backdrop texture and the wgpu surface stay in lockstep.
        let reported = self.window.window().physical_size();
        let size = Size::new(reported.width.max(1), reported.height.max(1));
        if size != self.raster.size() {
            tracing::info!("Resizing graph surface to {}x{}", size.width, size.height);
            self.raster = RasterSurface::new(size)?;
            self.backdrop.resize(&context, size.width, size.height);
            self.window
                .resized(PhysicalSize::new(size.width, size.height));
        }

        let surface_width = size.width as f32;
        let surface_height = size.height as f32;

        // Background: grid, tick labels, axis title.
        self.raster.clear();
        self.ticks
            .ensure_coverage(current_time, &mut self.shaper, &self.tick_font);
        rasterize_background(
            &mut self.raster,
            &self.ticks,
            &self.axis_title,
            current_time,
            window_width,
        );
        self.backdrop
            .upload(&context, self.raster.data(), self.raster.stride_bytes());

        // Overlay: project visible samples to screen space, extended 20
        // time units past the last sample so the right edge never shows
        // an exposed endpoint. The extension is purely presentational;
        // the data window never stores it.
        self.points.clear();
        if let Some(last) = self.data.last() {
            let last = *last;
            for sample in self.data.iter() {
                self.points.push(Vec2::new(
                    surface_width - (current_time - sample.time) * surface_width / window_width,
                    surface_height * (1.0 - self.range.project(sample.value)),
                ));
            }
            self.points.push(Vec2::new(
                surface_width - (current_time - (last.time + 20.0)) * surface_width / window_width,
                surface_height * (1.0 - self.range.project(last.value)),
            ));

            let triangles = expand_polyline(&self.points, self.curve_width / 2.0);
            self.overlay.prepare(&triangles);
        } else {
            self.overlay.prepare(&[]);
        }

        // Composite and present.
        let mut frame = self.window.begin_drawing();
        {
            let mut pass = frame.begin_pass(Some("Graph Pass"), ClearOp::Clear(wgpu::Color::WHITE));
            self.blit.blit(&mut pass, self.backdrop.view());
            if !self.points.is_empty() {
                self.overlay
                    .render(&mut pass, (surface_width, surface_height), self.curve_color);
            }
        }
        frame.finish();

        Ok(())
    }
}

const INK_R: u8 = 0;
const INK_G: u8 = 0;
const INK_B: u8 = 102; // 0.4

/// Rasterize the static layer: tick labels, vertical grid lines and the
/// axis title. Deterministic in (surface size, cache contents, view).
fn rasterize_background(
    raster: &mut RasterSurface,
    ticks: &TickLabelCache,
    axis_title: &ShapedText,
    current_time: f32,
    window_width: f32,
) {
    let width = raster.width() as f32;
    let height = raster.height() as f32;

    let label_color = tiny_skia::Color::from_rgba8(INK_R, INK_G, INK_B, 255);
    let grid_color = tiny_skia::Color::from_rgba8(INK_R, INK_G, INK_B, 64);

    let mut grid_paint = Paint::default();
    grid_paint.set_color(grid_color);
    grid_paint.anti_alias = true;
    let grid_stroke = Stroke {
        width: 2.0,
        ..Stroke::default()
    };

    for label in ticks.iter() {
        let x = width - (current_time - label.tick as f32) * width / window_width;

        label
            .text
            .draw_centered_at(raster.pixmap_mut(), x, height * 9.0 / 10.0, label_color);

        // Vertical grid line spanning the middle of the plot.
        let mut path = PathBuilder::new();
        path.move_to(x, height * 0.25 / 10.0);
        path.line_to(x, height * 8.5 / 10.0);
        if let Some(path) = path.finish() {
            raster.pixmap_mut().stroke_path(
                &path,
                &grid_paint,
                &grid_stroke,
                Transform::identity(),
                None,
            );
        }
    }

    axis_title.draw_centered_at(
        raster.pixmap_mut(),
        width / 2.0,
        height * 9.6 / 10.0,
        label_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shaped_fixture() -> (TextShaper, TickLabelCache, ShapedText) {
        let mut shaper = TextShaper::new();
        let title = shaper.shape("time (s)", &FontSpec::sans(20.0));
        let mut ticks = TickLabelCache::new();
        ticks.ensure_coverage(2.0, &mut shaper, &FontSpec::sans(30.0));
        (shaper, ticks, title)
    }

    fn render_at(size: Size<u32>, ticks: &TickLabelCache, title: &ShapedText) -> Vec<u8> {
        let mut raster = RasterSurface::new(size).unwrap();
        rasterize_background(&mut raster, ticks, title, 2.0, 5.0);
        raster.data().to_vec()
    }

    #[test]
    fn background_depends_only_on_inputs() {
        let (_shaper, ticks, title) = shaped_fixture();
        let first = render_at(Size::new(320, 240), &ticks, &title);
        let second = render_at(Size::new(320, 240), &ticks, &title);
        assert_eq!(first, second);
    }

    #[test]
    fn resize_round_trip_is_pixel_identical() {
        let (_shaper, ticks, title) = shaped_fixture();

        let original = render_at(Size::new(320, 240), &ticks, &title);
        let resized = render_at(Size::new(640, 480), &ticks, &title);
        let restored = render_at(Size::new(320, 240), &ticks, &title);

        assert_eq!(resized.len(), 640 * 480 * 4);
        assert_eq!(original, restored);
    }

    #[test]
    fn background_marks_the_surface() {
        let (_shaper, ticks, title) = shaped_fixture();
        let mut raster = RasterSurface::new(Size::new(320, 240)).unwrap();
        let blank = raster.data().to_vec();

        rasterize_background(&mut raster, &ticks, &title, 2.0, 5.0);
        assert_ne!(blank, raster.data());
    }

    #[test]
    fn empty_cache_renders_title_only() {
        let mut shaper = TextShaper::new();
        let title = shaper.shape("time (s)", &FontSpec::sans(20.0));
        let ticks = TickLabelCache::new();

        let mut raster = RasterSurface::new(Size::new(320, 240)).unwrap();
        let blank = raster.data().to_vec();
        rasterize_background(&mut raster, &ticks, &title, 2.0, 5.0);

        // Only the title band near the bottom differs from a blank frame.
        let stride = raster.stride_bytes() as usize;
        let band_start = 240 * 8 / 10 * stride;
        assert_eq!(blank[..band_start], raster.data()[..band_start]);
        assert_ne!(blank[band_start..], raster.data()[band_start..]);
    }
}
