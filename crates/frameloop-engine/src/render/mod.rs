//! Rendering backend contracts.
//!
//! The loop hands a backend the scene and the validated camera once per frame.
//! Backends own all GPU state; the loop only sizes the surface and mirrors the
//! per-frame uniform block.

pub mod chunks;
mod headless;
mod surface;
mod uniforms;

pub use headless::HeadlessSurface;
pub use surface::{RenderSurface, SurfaceSize};
pub use uniforms::{FrameUniforms, UNIFORMS_CHUNK, UNIFORMS_WGSL};
