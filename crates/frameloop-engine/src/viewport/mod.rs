//! Resize handling.

mod manager;

pub use manager::ViewportManager;
