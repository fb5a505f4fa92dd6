//! Platform abstraction.
//!
//! The loop never talks to a window system directly. A host supplies:
//! - a [`FrameScheduler`]: "run this callback before the next repaint" plus cancel
//! - a [`PlatformEventSource`]: raw resize / pointer-move subscriptions and
//!   window size / pixel density queries
//!
//! `window::WinitPlatform` is the windowed host; [`HeadlessPlatform`] is an
//! in-process host pumped by hand.

mod headless;
mod host;

use std::rc::Rc;

pub use headless::HeadlessPlatform;
pub use host::HostQueues;

/// Token for a scheduled frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One-shot callback run on the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// The platform's repaint-aligned scheduling primitive.
///
/// Callbacks requested while a frame is being run belong to the next frame.
/// A cancelled callback must never run.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Classes of raw window events the loop samples.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RawEventKind {
    Resize,
    PointerMove,
}

/// Raw window event as delivered by the host.
///
/// A resize carries no payload: dimensions are re-read from the platform when
/// the signal is consumed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RawEvent {
    Resize,
    /// Pointer position in logical window pixels, origin top-left.
    PointerMove { client_x: f32, client_y: f32 },
}

impl RawEvent {
    pub fn kind(&self) -> RawEventKind {
        match self {
            RawEvent::Resize => RawEventKind::Resize,
            RawEvent::PointerMove { .. } => RawEventKind::PointerMove,
        }
    }
}

/// Token for a raw event subscription.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

pub type RawEventHandler = Box<dyn FnMut(&RawEvent)>;

/// Raw window events and environment queries.
pub trait PlatformEventSource {
    fn subscribe(&self, kind: RawEventKind, handler: RawEventHandler) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);

    /// Current window size in logical pixels.
    fn window_size(&self) -> (u32, u32);

    /// Device pixels per logical pixel. Hosts without the notion return 1.0.
    fn pixel_density(&self) -> f64;
}

/// A complete host for an `Application`.
pub trait Platform: PlatformEventSource {
    /// Returns the frame scheduler, or `None` if the host cannot drive
    /// repaint-aligned callbacks. Construction fails in that case.
    fn frame_scheduler(&self) -> Option<Rc<dyn FrameScheduler>>;
}
