use std::sync::Arc;

pub use winit::dpi::PhysicalSize;
pub use winit::window::Window as WinitWindow;
use winit::{error::OsError, event_loop::ActiveEventLoop};

pub struct WindowDescriptor {
    pub title: String,
    pub resizeable: bool,
    pub size: Option<PhysicalSize<u32>>,
    pub visible: bool,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "Stripchart".to_string(),
            resizeable: true,
            size: None,
            visible: true,
        }
    }
}

pub struct Window {
    pub window: Arc<winit::window::Window>,
}

impl Window {
    pub fn id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    /// Get the physical size of the window in pixels.
    ///
    /// The compositor compares this against its raster surface at the top
    /// of every frame to detect resizes.
    pub fn physical_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub(crate) fn new(
        event_loop: &ActiveEventLoop,
        descriptor: WindowDescriptor,
    ) -> Result<Self, OsError> {
        let mut attributes = WinitWindow::default_attributes()
            .with_title(descriptor.title)
            .with_resizable(descriptor.resizeable)
            .with_visible(descriptor.visible);

        if let Some(size) = descriptor.size {
            attributes = attributes.with_inner_size(size);
        }

        let window = Arc::new(event_loop.create_window(attributes)?);

        Ok(Window { window })
    }
}

/// A drawing backend attached to a window.
///
/// `begin_drawing` yields a per-frame context whose drop submits the
/// frame and presents it, blocking on vertical sync.
pub trait WindowBackend {
    type FrameContext;

    fn begin_drawing(&mut self) -> Self::FrameContext;
}
