pub mod backdrop;
pub mod blit;
pub mod context;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod window;

pub use backdrop::BackdropTexture;
pub use blit::BlitRenderer;
pub use context::{GraphicsContext, GraphicsContextDescriptor};
pub use error::GraphicsError;
pub use frame::{ClearOp, FrameContext};
pub use overlay::{OverlayRenderer, expand_polyline};
pub use window::{WindowContext, WindowContextDescriptor};
