//! Real-time scrolling time-series graph renderer.
//!
//! A [`Graph`] ingests a live stream of `(time, value)` samples and draws
//! a windowed, auto-scaled visualization every frame: grid lines and
//! numeric tick labels rasterized on the CPU and blitted as a backdrop
//! texture, with the data curve drawn on top as GPU geometry. The
//! [`driver`] module ties a graph to a window and paces the loop off
//! vertical sync.

pub mod data;
pub mod driver;
pub mod graph;
pub mod range;
pub mod ticks;

pub use data::{DataWindow, Sample};
pub use driver::{SampleSource, run};
pub use graph::{Graph, GraphDescriptor, GraphError};
pub use range::{Extremes, VerticalRange};
pub use ticks::TickLabelCache;
