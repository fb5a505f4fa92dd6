//! wgpu-backed render surface.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for a winit window
//! - configuring the swapchain from the logical size and pixel ratio the
//!   application applies on resize
//! - clearing to the scene background and drawing an optional full-screen
//!   backdrop shader fed by the frame uniforms

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use gpu::GpuSurface;
pub use init::GpuInit;
