use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::coords::Vec2;

/// Names of the events emitted by an `Application`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Start,
    Stop,
    Update,
    Resize,
    MouseMove,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Stop => "stop",
            EventKind::Update => "update",
            EventKind::Resize => "resize",
            EventKind::MouseMove => "mousemove",
        }
    }
}

impl AsRef<str> for EventKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payloads.
///
/// Listeners receive `&AppEvent` borrowed for the duration of the call only;
/// copy out what must outlive it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AppEvent {
    Start,
    Stop,
    Update {
        /// Seconds since the previous frame.
        delta: f32,
        /// Seconds since `start`.
        elapsed_time: f64,
    },
    Resize {
        width: u32,
        height: u32,
    },
    MouseMove {
        /// Normalized pointer position, `[-1, 1]` on both axes, +Y up.
        pointer: Vec2,
    },
}

impl AppEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            AppEvent::Start => EventKind::Start,
            AppEvent::Stop => EventKind::Stop,
            AppEvent::Update { .. } => EventKind::Update,
            AppEvent::Resize { .. } => EventKind::Resize,
            AppEvent::MouseMove { .. } => EventKind::MouseMove,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Token returned by listener registration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerHandle(u64);

type Listener = Box<dyn FnMut(&AppEvent)>;

struct Entry {
    handle: ListenerHandle,
    name: String,
    removed: Cell<bool>,
    listener: RefCell<Listener>,
}

/// Name-keyed listener registry with synchronous, in-order dispatch.
///
/// Listener-set changes made during a dispatch:
/// - listeners added are not called by that dispatch
/// - listeners removed are skipped if not reached yet
///
/// A listener re-entered through a nested dispatch is skipped with a warning.
#[derive(Default)]
pub struct EventDispatcher {
    next_id: Cell<u64>,
    entries: RefCell<Vec<Rc<Entry>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: &str, listener: impl FnMut(&AppEvent) + 'static) -> ListenerHandle {
        let handle = ListenerHandle(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));

        self.entries.borrow_mut().push(Rc::new(Entry {
            handle,
            name: name.to_string(),
            removed: Cell::new(false),
            listener: RefCell::new(Box::new(listener)),
        }));

        handle
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove(&self, handle: ListenerHandle) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(index) = entries.iter().position(|e| e.handle == handle) else {
            return false;
        };

        entries.remove(index).removed.set(true);
        true
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.borrow().iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispatch(&self, event: &AppEvent) {
        let name = event.name();
        let targets: Vec<Rc<Entry>> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect();

        for entry in targets {
            if entry.removed.get() {
                continue;
            }

            match entry.listener.try_borrow_mut() {
                Ok(mut listener) => (*listener)(event),
                Err(_) => log::warn!("\"{name}\" listener re-entered during its own dispatch; skipped"),
            }
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.len())
            .finish()
    }
}
