//! Scrolling graph of a slowly drifting sine wave.

use stripchart::GraphDescriptor;

fn main() {
    stripchart_core::logging::init();

    let descriptor = GraphDescriptor::new()
        .title("stripchart - sine")
        .window_width(10.0);

    stripchart::run(descriptor, |t: f32| {
        Some(0.5 + 0.4 * (t * 0.7).sin() + 0.05 * (t * 5.3).sin())
    });
}
