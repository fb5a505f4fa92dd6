//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and exposes them to the application
//! as a [`Platform`](crate::platform::Platform): redraw requests drive the
//! frame scheduler, window events feed the raw resize/pointer subscriptions.

mod platform;
mod runtime;

pub use platform::WinitPlatform;
pub use runtime::{Runtime, RuntimeConfig};
