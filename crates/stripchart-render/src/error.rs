/// Errors raised while acquiring GPU resources.
///
/// All of these are fatal: the frame loop is aborted and the process
/// exits. Per-frame surface faults are not represented here because the
/// GPU state is assumed corrupted once one occurs.
#[derive(Debug)]
pub enum GraphicsError {
    /// No suitable GPU adapter was found.
    NoAdapter,

    /// The adapter refused to create a device.
    RequestDevice(wgpu::RequestDeviceError),

    /// Surface creation for the window failed.
    CreateSurface(wgpu::CreateSurfaceError),

    /// The adapter offers no usable configuration for the surface.
    SurfaceConfig,
}

impl std::fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphicsError::NoAdapter => write!(f, "no suitable GPU adapter found"),
            GraphicsError::RequestDevice(err) => write!(f, "failed to create device: {}", err),
            GraphicsError::CreateSurface(err) => write!(f, "failed to create surface: {}", err),
            GraphicsError::SurfaceConfig => {
                write!(f, "adapter offers no usable surface configuration")
            }
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphicsError::RequestDevice(err) => Some(err),
            GraphicsError::CreateSurface(err) => Some(err),
            _ => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for GraphicsError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        GraphicsError::RequestDevice(err)
    }
}

impl From<wgpu::CreateSurfaceError> for GraphicsError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        GraphicsError::CreateSurface(err)
    }
}

/// Result type for graphics operations.
pub type GraphicsResult<T> = Result<T, GraphicsError>;
