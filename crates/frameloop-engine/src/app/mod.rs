//! Application orchestrator.
//!
//! Composes the frame scheduler, input sampler, viewport manager and clock into
//! a start/stop lifecycle, and dispatches named events to client listeners.

mod application;
mod config;
mod error;
mod events;

pub use application::{Application, ApplicationBuilder, WeakApplication};
pub use config::AppConfig;
pub use error::AppError;
pub use events::{AppEvent, EventDispatcher, EventKind, ListenerHandle};
