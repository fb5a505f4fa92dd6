//! Time subsystem.
//!
//! Provides the stopwatch that drives per-frame delta/elapsed values.
//! Intended usage:
//! - one `FrameClock` per application instance
//! - `start()`/`stop()` follow the application lifecycle
//! - call `tick()` once per frame to obtain `FrameTime`

mod frame_clock;
mod source;

pub use frame_clock::{FrameClock, FrameTime};
pub use source::{ManualTime, MonotonicTime, TimeSource};
