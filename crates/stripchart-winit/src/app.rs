use std::collections::HashMap;
pub use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use crate::{
    event::{Event, EventBatch, EventQueue, HandleStatus},
    window::{Window, WindowDescriptor},
};

struct WindowResources {
    events: EventQueue,
}

pub struct AppCtx<'a> {
    event_loop: &'a ActiveEventLoop,
    windows: &'a mut HashMap<WindowId, WindowResources>,
}

impl AppCtx<'_> {
    pub fn create_window(&mut self, descriptor: WindowDescriptor) -> Result<Window, OsError> {
        let window = Window::new(self.event_loop, descriptor)?;

        self.windows.insert(
            window.id(),
            WindowResources {
                events: EventQueue::new(),
            },
        );

        Ok(window)
    }

    pub fn exit(&self) {
        self.event_loop.exit();
    }
}

pub trait App {
    /// Called once per redraw of a window, with the events that arrived
    /// since the previous frame. This is where the driver loop advances
    /// time, feeds samples and draws.
    fn render(&mut self, ctx: &mut AppCtx, window_id: WindowId, events: &mut EventBatch);

    /// Called when the app is about to exit.
    #[allow(unused_variables)]
    fn on_exit(&mut self, ctx: &mut AppCtx) {}
}

struct AppProxy<F> {
    factory: Option<F>,
    app: Option<Box<dyn App>>,
    windows: HashMap<WindowId, WindowResources>,
}

impl<F> winit::application::ApplicationHandler for AppProxy<F>
where
    F: FnOnce(&mut AppCtx) -> Box<dyn App>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_none()
            && let Some(factory) = self.factory.take()
        {
            let mut ctx = AppCtx {
                event_loop,
                windows: &mut self.windows,
            };
            let app = factory(&mut ctx);
            self.app = Some(app);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        use winit::event::WindowEvent;

        let Some(app) = self.app.as_mut() else {
            return;
        };

        let mut ctx = AppCtx {
            event_loop,
            windows: &mut self.windows,
        };

        match event {
            WindowEvent::RedrawRequested => {
                let Some(window) = ctx.windows.get_mut(&window_id) else {
                    return;
                };
                let mut events = window.events.drain();

                app.render(&mut ctx, window_id, &mut events);

                // Default handling for anything the app left in the batch.
                events.dispatch(|event| match event {
                    Event::CloseRequested => {
                        tracing::info!("Close requested for window {window_id:?}");
                        app.on_exit(&mut ctx);
                        ctx.event_loop.exit();
                        HandleStatus::consumed()
                    }
                    _ => HandleStatus::ignored(),
                });
            }
            event => {
                let Some(window) = self.windows.get_mut(&window_id) else {
                    return;
                };
                if let Some(event) = Event::from_winit(event) {
                    window.events.push(event);
                }
            }
        }
    }
}

/// Run the application with the given factory function.
///
/// The loop wakes on events only; continuous animation comes from the
/// frame context requesting the next redraw when it presents.
pub fn run_app<F>(factory: F)
where
    F: FnOnce(&mut AppCtx) -> Box<dyn App>,
{
    use winit::event_loop::{ControlFlow, EventLoop};
    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut app_proxy = AppProxy {
        factory: Some(factory),
        app: None,
        windows: HashMap::new(),
    };
    event_loop
        .run_app(&mut app_proxy)
        .expect("failed to run app");
}
