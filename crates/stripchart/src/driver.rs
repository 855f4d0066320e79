//! The driver loop: advance simulated time, feed samples, draw, and
//! poll for termination.

use stripchart_core::time::TimeTracker;
use stripchart_render::{GraphicsContext, WindowContext, WindowContextDescriptor};
use stripchart_winit::{
    WindowId,
    app::{App, AppCtx, run_app},
    event::{EventBatch, Key, NamedKey},
    window::{PhysicalSize, WindowDescriptor},
};

use crate::graph::{Graph, GraphDescriptor};

/// Produces sample values for the graph as simulated time advances.
pub trait SampleSource {
    /// The value to append at time `t`, or `None` to skip this frame.
    fn sample(&mut self, t: f32) -> Option<f32>;
}

impl<F> SampleSource for F
where
    F: FnMut(f32) -> Option<f32>,
{
    fn sample(&mut self, t: f32) -> Option<f32> {
        self(t)
    }
}

struct Driver {
    graph: Graph,
    source: Box<dyn SampleSource>,
    time: TimeTracker,
    current_time: f32,
    window_width: f32,
    window_id: WindowId,
}

impl App for Driver {
    fn render(&mut self, ctx: &mut AppCtx, window_id: WindowId, events: &mut EventBatch) {
        if window_id != self.window_id {
            return;
        }

        // Termination is honored at the top of the iteration; a frame
        // already in progress always runs to completion.
        if events.close_requested() || events.key_pressed(&Key::Named(NamedKey::Escape)) {
            ctx.exit();
            return;
        }

        // Presentation blocks on vsync, so the wall-clock delta is the
        // refresh interval; simulated time tracks it.
        let frame = self.time.tick();
        self.current_time += frame.delta_seconds();

        if let Some(value) = self.source.sample(self.current_time) {
            self.graph.push_sample(self.current_time, value);
        }

        self.graph.set_window(self.current_time, self.window_width);
        self.graph.update_range();

        if let Err(err) = self.graph.blocking_draw(self.current_time, self.window_width) {
            tracing::error!("Fatal graphics error: {err}");
            ctx.exit();
        }
    }
}

/// Open a window and run the graph until it is closed or Escape is
/// pressed.
pub fn run(descriptor: GraphDescriptor, source: impl SampleSource + 'static) {
    run_app(move |ctx| {
        let window = ctx
            .create_window(WindowDescriptor {
                title: descriptor.title.clone(),
                size: Some(PhysicalSize::new(
                    descriptor.initial_size.width,
                    descriptor.initial_size.height,
                )),
                ..Default::default()
            })
            .expect("failed to create window");
        let window_id = window.id();
        window.request_redraw();

        let context = GraphicsContext::new_sync().expect("failed to create graphics context");
        let window_ctx = WindowContext::new(window, context, WindowContextDescriptor::default())
            .expect("failed to configure surface");
        let graph = Graph::new(window_ctx, &descriptor).expect("failed to create graph");

        Box::new(Driver {
            graph,
            source: Box::new(source),
            time: TimeTracker::new(),
            current_time: 0.0,
            window_width: descriptor.window_width,
            window_id,
        })
    });
}
