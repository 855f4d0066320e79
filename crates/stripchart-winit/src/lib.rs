pub mod app;
pub mod event;
pub mod window;

// Re-export WindowId for convenience
pub use winit::window::WindowId;
