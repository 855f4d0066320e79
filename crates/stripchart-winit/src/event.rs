pub use winit::dpi::PhysicalSize;
pub use winit::event::ElementState;
pub use winit::keyboard::{Key, NamedKey};

use std::collections::VecDeque;

/// Per-window event queue.
///
/// Close and resize requests are queued ahead of everything else so the
/// driver observes them before drawing the frame.
pub struct EventQueue {
    pending: VecDeque<Event>,
    priority: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(16),
            priority: VecDeque::with_capacity(4),
        }
    }

    /// Push event to queue (called from the winit handler)
    pub fn push(&mut self, event: Event) {
        match event {
            Event::CloseRequested | Event::Resized(_) => {
                self.priority.push_back(event);
            }
            _ => {
                self.pending.push_back(event);
            }
        }
    }

    /// Take all queued events for this frame.
    pub fn drain(&mut self) -> EventBatch {
        let mut events = Vec::with_capacity(self.priority.len() + self.pending.len());
        events.extend(self.priority.drain(..));
        events.extend(self.pending.drain(..));
        EventBatch { events }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventBatch {
    events: Vec<Event>,
}

impl EventBatch {
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True if any queued event is a press of `key`.
    pub fn key_pressed(&self, key: &Key) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, Event::KeyPressed(k) if k == key))
    }

    /// True if the window's close button was used.
    pub fn close_requested(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, Event::CloseRequested))
    }

    pub fn dispatch<H>(&mut self, mut handler: H)
    where
        H: FnMut(&Event) -> HandleStatus,
    {
        self.events.retain(|event| {
            let status = handler(event);
            !status.is_consumed()
        });
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    /// Window resized to a new physical size.
    Resized(PhysicalSize<u32>),
    /// Window close requested.
    CloseRequested,
    /// A key was pressed (not a repeat).
    KeyPressed(Key),
}

impl Event {
    /// Translate a winit window event, dropping everything the driver
    /// loop has no use for.
    pub fn from_winit(event: winit::event::WindowEvent) -> Option<Self> {
        use winit::event::WindowEvent;

        match event {
            WindowEvent::CloseRequested => Some(Event::CloseRequested),
            WindowEvent::Resized(size) => Some(Event::Resized(size)),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                Some(Event::KeyPressed(event.logical_key))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HandleStatus {
    consumed: bool,
}

impl HandleStatus {
    pub fn consumed() -> Self {
        Self { consumed: true }
    }

    pub fn ignored() -> Self {
        Self { consumed: false }
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_requested_drains_first() {
        let mut queue = EventQueue::new();
        queue.push(Event::KeyPressed(Key::Named(NamedKey::Escape)));
        queue.push(Event::CloseRequested);

        let batch = queue.drain();
        assert!(matches!(batch.iter().next(), Some(Event::CloseRequested)));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn key_pressed_matches_named_key() {
        let mut queue = EventQueue::new();
        queue.push(Event::KeyPressed(Key::Named(NamedKey::Escape)));

        let batch = queue.drain();
        assert!(batch.key_pressed(&Key::Named(NamedKey::Escape)));
        assert!(!batch.key_pressed(&Key::Named(NamedKey::Enter)));
        assert!(!batch.close_requested());
    }

    #[test]
    fn drained_queue_is_empty() {
        let mut queue = EventQueue::new();
        queue.push(Event::CloseRequested);
        let _ = queue.drain();
        assert!(queue.drain().is_empty());
    }
}
