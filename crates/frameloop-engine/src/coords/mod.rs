//! Small value types shared by the loop, the viewport path and the backends.
//!
//! Spaces in use:
//! - window space: logical pixels, origin top-left, +Y down
//! - pointer space: normalized `[-1, 1]` on both axes, origin centre, +Y up

mod color;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use viewport::Viewport;
