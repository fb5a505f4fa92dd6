use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{
    FrameCallback, FrameHandle, FrameScheduler, RawEvent, RawEventHandler, RawEventKind,
    SubscriptionId,
};

struct Subscriber {
    id: SubscriptionId,
    kind: RawEventKind,
    handler: Rc<RefCell<RawEventHandler>>,
}

/// Frame-callback queue and raw-event fan-out shared by the bundled hosts.
///
/// Single-threaded; every method takes `&self` so the queues can sit behind an
/// `Rc` handed to both the host loop and the scheduler.
#[derive(Default)]
pub struct HostQueues {
    next_id: Cell<u64>,
    frames: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl HostQueues {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get().wrapping_add(1);
        self.next_id.set(id);
        id
    }

    // ── frames ────────────────────────────────────────────────────────────

    pub fn push_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle::new(self.next_id());
        self.frames.borrow_mut().push((handle, callback));
        handle
    }

    /// Removes a pending callback. Unknown or already-run handles are ignored.
    pub fn cancel(&self, handle: FrameHandle) {
        self.frames.borrow_mut().retain(|(h, _)| *h != handle);
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Runs the callbacks that were pending when the frame began.
    ///
    /// Callbacks requested during the run are left for the next frame; a
    /// callback cancelled by an earlier one in the same frame is skipped.
    /// Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let due: Vec<FrameHandle> = self.frames.borrow().iter().map(|(h, _)| *h).collect();
        let mut ran = 0;

        for handle in due {
            let callback = {
                let mut frames = self.frames.borrow_mut();
                frames
                    .iter()
                    .position(|(h, _)| *h == handle)
                    .map(|index| frames.remove(index).1)
            };

            if let Some(callback) = callback {
                callback();
                ran += 1;
            }
        }

        ran
    }

    // ── raw events ────────────────────────────────────────────────────────

    pub fn subscribe(&self, kind: RawEventKind, handler: RawEventHandler) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id());
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|s| s.id != id);
    }

    pub fn subscriber_count(&self, kind: RawEventKind) -> usize {
        self.subscribers.borrow().iter().filter(|s| s.kind == kind).count()
    }

    /// Delivers `event` to every subscriber of its kind.
    pub fn emit(&self, event: &RawEvent) {
        let kind = event.kind();
        let handlers: Vec<_> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| Rc::clone(&s.handler))
            .collect();

        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => (*handler)(event),
                Err(_) => log::warn!("raw {kind:?} handler re-entered; event dropped"),
            }
        }
    }
}

impl FrameScheduler for HostQueues {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.push_frame(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.cancel(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, move || h.set(h.get() + 1))
    }

    // ── frames ────────────────────────────────────────────────────────────

    #[test]
    fn cancelled_callback_never_runs() {
        let queues = HostQueues::new();
        let (hits, cb) = counter();
        let handle = queues.push_frame(Box::new(cb));
        queues.cancel(handle);

        assert_eq!(queues.run_frame(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn callbacks_requested_during_a_frame_wait_for_the_next() {
        let queues = Rc::new(HostQueues::new());
        let (hits, cb) = counter();

        let q = Rc::clone(&queues);
        queues.push_frame(Box::new(move || {
            q.push_frame(Box::new(cb));
        }));

        assert_eq!(queues.run_frame(), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(queues.pending_frames(), 1);

        assert_eq!(queues.run_frame(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn callback_cancelled_mid_frame_is_skipped() {
        let queues = Rc::new(HostQueues::new());
        let (hits, cb) = counter();

        let victim = Rc::new(Cell::new(None));
        let q = Rc::clone(&queues);
        let v = Rc::clone(&victim);
        queues.push_frame(Box::new(move || {
            if let Some(handle) = v.get() {
                q.cancel(handle);
            }
        }));
        victim.set(Some(queues.push_frame(Box::new(cb))));

        assert_eq!(queues.run_frame(), 1);
        assert_eq!(hits.get(), 0);
    }

    // ── raw events ────────────────────────────────────────────────────────

    #[test]
    fn emit_reaches_only_matching_kind() {
        let queues = HostQueues::new();
        let resizes = Rc::new(Cell::new(0));
        let r = Rc::clone(&resizes);
        queues.subscribe(RawEventKind::Resize, Box::new(move |_| r.set(r.get() + 1)));

        queues.emit(&RawEvent::PointerMove { client_x: 1.0, client_y: 2.0 });
        queues.emit(&RawEvent::Resize);

        assert_eq!(resizes.get(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let queues = HostQueues::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = queues.subscribe(RawEventKind::Resize, Box::new(move |_| h.set(h.get() + 1)));

        queues.unsubscribe(id);
        queues.emit(&RawEvent::Resize);

        assert_eq!(hits.get(), 0);
        assert_eq!(queues.subscriber_count(RawEventKind::Resize), 0);
    }
}
