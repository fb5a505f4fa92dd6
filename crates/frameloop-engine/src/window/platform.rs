use std::rc::Rc;
use std::sync::Arc;

use winit::dpi::PhysicalPosition;
use winit::window::Window;

use crate::platform::{
    FrameCallback, FrameHandle, FrameScheduler, HostQueues, Platform, PlatformEventSource,
    RawEvent, RawEventHandler, RawEventKind, SubscriptionId,
};

/// [`Platform`] backed by a winit window.
///
/// Frame callbacks run on the window's next `RedrawRequested`; requesting one
/// also requests a redraw. Cheap to clone.
#[derive(Clone)]
pub struct WinitPlatform {
    window: Arc<Window>,
    queues: Rc<HostQueues>,
}

impl WinitPlatform {
    pub(super) fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            queues: Rc::new(HostQueues::new()),
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub(super) fn emit(&self, event: &RawEvent) {
        self.queues.emit(event);
    }

    pub(super) fn pointer_moved(&self, position: PhysicalPosition<f64>) {
        let logical = position.to_logical::<f64>(self.window.scale_factor());
        self.emit(&RawEvent::PointerMove {
            client_x: logical.x as f32,
            client_y: logical.y as f32,
        });
    }

    pub(super) fn run_frame(&self) -> usize {
        self.queues.run_frame()
    }

    pub(super) fn has_pending_frames(&self) -> bool {
        self.queues.pending_frames() > 0
    }
}

impl PlatformEventSource for WinitPlatform {
    fn subscribe(&self, kind: RawEventKind, handler: RawEventHandler) -> SubscriptionId {
        self.queues.subscribe(kind, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.queues.unsubscribe(id);
    }

    fn window_size(&self) -> (u32, u32) {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        (logical.width.round() as u32, logical.height.round() as u32)
    }

    fn pixel_density(&self) -> f64 {
        self.window.scale_factor()
    }
}

impl Platform for WinitPlatform {
    fn frame_scheduler(&self) -> Option<Rc<dyn FrameScheduler>> {
        Some(Rc::new(RedrawScheduler {
            window: Arc::clone(&self.window),
            queues: Rc::clone(&self.queues),
        }))
    }
}

struct RedrawScheduler {
    window: Arc<Window>,
    queues: Rc<HostQueues>,
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = self.queues.push_frame(callback);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.queues.cancel(handle);
    }
}
