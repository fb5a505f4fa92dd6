use std::cell::RefCell;
use std::rc::Rc;

use crate::platform::{PlatformEventSource, RawEvent, RawEventKind, SubscriptionId};

/// Latest raw pointer position, in logical window pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    pub client_x: f32,
    pub client_y: f32,
}

#[derive(Debug, Default)]
struct PendingSlots {
    resize: bool,
    pointer: Option<PointerSample>,
}

/// Coalesces raw events into one pending slot per class.
///
/// Each raw event overwrites the slot; nothing queues up behind it. Slots are
/// cleared only by the `take_*` calls.
#[derive(Debug, Default)]
pub struct InputSampler {
    slots: Rc<RefCell<PendingSlots>>,
    subscriptions: Vec<SubscriptionId>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Subscribes to resize and pointer-move events on `source`.
    ///
    /// Calling this while attached does nothing.
    pub fn attach<S>(&mut self, source: &S)
    where
        S: PlatformEventSource + ?Sized,
    {
        if self.is_attached() {
            return;
        }

        for kind in [RawEventKind::Resize, RawEventKind::PointerMove] {
            let slots = Rc::clone(&self.slots);
            let id = source.subscribe(
                kind,
                Box::new(move |event| record(&mut slots.borrow_mut(), event)),
            );
            self.subscriptions.push(id);
        }
    }

    /// Drops the subscriptions. Pending slots are kept.
    pub fn detach<S>(&mut self, source: &S)
    where
        S: PlatformEventSource + ?Sized,
    {
        for id in self.subscriptions.drain(..) {
            source.unsubscribe(id);
        }
    }

    /// Records a raw event as if it came through a subscription.
    pub fn record(&self, event: &RawEvent) {
        record(&mut self.slots.borrow_mut(), event);
    }

    pub fn has_pending_resize(&self) -> bool {
        self.slots.borrow().resize
    }

    pub fn has_pending_pointer(&self) -> bool {
        self.slots.borrow().pointer.is_some()
    }

    /// Consumes the pending resize signal, returning whether one was set.
    pub fn take_resize(&self) -> bool {
        std::mem::take(&mut self.slots.borrow_mut().resize)
    }

    pub fn take_pointer(&self) -> Option<PointerSample> {
        self.slots.borrow_mut().pointer.take()
    }
}

fn record(slots: &mut PendingSlots, event: &RawEvent) {
    match *event {
        RawEvent::Resize => slots.resize = true,
        RawEvent::PointerMove { client_x, client_y } => {
            slots.pointer = Some(PointerSample { client_x, client_y });
        }
    }
}
