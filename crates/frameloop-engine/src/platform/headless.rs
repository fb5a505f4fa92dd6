use std::cell::Cell;
use std::rc::Rc;

use super::host::HostQueues;
use super::{
    FrameScheduler, Platform, PlatformEventSource, RawEvent, RawEventHandler, RawEventKind,
    SubscriptionId,
};

/// In-process host without a window system.
///
/// The caller plays the window system: it changes the reported window size,
/// feeds raw events, and pumps frames with [`run_frame`](Self::run_frame).
pub struct HeadlessPlatform {
    queues: Rc<HostQueues>,
    window: Cell<(u32, u32)>,
    pixel_density: Cell<f64>,
    scheduler: bool,
}

impl HeadlessPlatform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            queues: Rc::new(HostQueues::new()),
            window: Cell::new((width, height)),
            pixel_density: Cell::new(1.0),
            scheduler: true,
        }
    }

    /// A host that offers no frame scheduler; `Application` construction fails.
    pub fn without_scheduler(width: u32, height: u32) -> Self {
        Self { scheduler: false, ..Self::new(width, height) }
    }

    pub fn set_window_size(&self, width: u32, height: u32) {
        self.window.set((width, height));
    }

    pub fn set_pixel_density(&self, density: f64) {
        self.pixel_density.set(density);
    }

    /// Changes the window size and emits a raw resize event.
    pub fn resize_window(&self, width: u32, height: u32) {
        self.set_window_size(width, height);
        self.queues.emit(&RawEvent::Resize);
    }

    /// Emits a raw pointer-move event at logical window coordinates.
    pub fn move_pointer(&self, client_x: f32, client_y: f32) {
        self.queues.emit(&RawEvent::PointerMove { client_x, client_y });
    }

    /// Runs one repaint's worth of frame callbacks.
    pub fn run_frame(&self) -> usize {
        self.queues.run_frame()
    }

    pub fn pending_frames(&self) -> usize {
        self.queues.pending_frames()
    }

    pub fn subscriber_count(&self, kind: RawEventKind) -> usize {
        self.queues.subscriber_count(kind)
    }
}

impl PlatformEventSource for HeadlessPlatform {
    fn subscribe(&self, kind: RawEventKind, handler: RawEventHandler) -> SubscriptionId {
        self.queues.subscribe(kind, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.queues.unsubscribe(id);
    }

    fn window_size(&self) -> (u32, u32) {
        self.window.get()
    }

    fn pixel_density(&self) -> f64 {
        self.pixel_density.get()
    }
}

impl Platform for HeadlessPlatform {
    fn frame_scheduler(&self) -> Option<Rc<dyn FrameScheduler>> {
        if !self.scheduler {
            return None;
        }
        let queues: Rc<dyn FrameScheduler> = self.queues.clone();
        Some(queues)
    }
}
