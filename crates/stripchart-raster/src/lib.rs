pub mod error;
pub mod surface;
pub mod text;

pub use error::{RasterError, RasterResult};
pub use surface::RasterSurface;
pub use text::{FontSpec, ShapedText, TextShaper};
