/// Errors raised while allocating the CPU raster surface.
///
/// These are configuration errors in the sense of the surface contract:
/// they are raised once at allocation time and never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The requested width cannot be represented by the rasterizer.
    UnsupportedWidth(u32),

    /// The rasterizer produced a row stride that violates the pixel
    /// contract (not a multiple of the pixel size, or smaller than a
    /// tightly packed row).
    StrideContract { stride_bytes: u32, width: u32 },

    /// Pixel buffer allocation failed for the requested dimensions.
    AllocationFailed { width: u32, height: u32 },
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::UnsupportedWidth(width) => {
                write!(f, "rasterizer does not support width {}", width)
            }
            RasterError::StrideContract {
                stride_bytes,
                width,
            } => write!(
                f,
                "rasterizer stride of {} bytes violates the pixel contract for width {}",
                stride_bytes, width
            ),
            RasterError::AllocationFailed { width, height } => {
                write!(f, "failed to allocate {}x{} raster surface", width, height)
            }
        }
    }
}

impl std::error::Error for RasterError {}

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;
