//! Frameloop engine crate.
//!
//! A small runtime shell around a render loop: it owns the render surface, the
//! frame clock and per-frame input sampling, and dispatches `start`, `stop`,
//! `update`, `resize` and `mousemove` events to client listeners once per frame.
//! Platform and rendering backends are reached through traits so the core can
//! run under winit/wgpu or fully headless.

pub mod app;
pub mod coords;
pub mod device;
pub mod input;
pub mod logging;
pub mod platform;
pub mod render;
pub mod scene;
pub mod time;
pub mod viewport;
pub mod window;

pub use app::{AppConfig, AppError, AppEvent, Application, ApplicationBuilder, EventKind, ListenerHandle};
