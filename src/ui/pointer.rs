use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use uuid::Uuid;

/// Screen position of a pointer press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned screen region owned by a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Hit test; the right and bottom edges are exclusive
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Identifier of a registered pointer listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

type Handler = Box<dyn Fn(Point) + Send + Sync>;
type Registry = Mutex<HashMap<ListenerId, Handler>>;

/// Document-level pointer-down listeners
///
/// Widgets register a handler for as long as they are mounted and receive
/// every press on the screen. Registration returns a [`ListenerGuard`];
/// dropping the guard removes the handler.
#[derive(Clone, Default)]
pub struct PointerListeners {
    inner: Arc<Registry>,
}

impl PointerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler called with every pointer press
    pub fn register<F>(&self, handler: F) -> ListenerGuard
    where
        F: Fn(Point) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.inner.lock().insert(id, Box::new(handler));
        tracing::debug!(listener = ?id, "Pointer listener registered");

        ListenerGuard {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers a pointer press to every registered handler
    pub fn dispatch(&self, point: Point) {
        for handler in self.inner.lock().values() {
            handler(point);
        }
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a pointer listener registered until dropped
pub struct ListenerGuard {
    id: ListenerId,
    registry: Weak<Registry>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(&self.id);
            tracing::debug!(listener = ?self.id, "Pointer listener removed");
        }
    }
}
