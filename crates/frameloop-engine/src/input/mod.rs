//! Input subsystem.
//!
//! Raw window events arrive at arbitrary rates. The sampler keeps only the
//! latest event per class; the application drains at most one resize and one
//! pointer move per frame.

mod pointer;
mod sampler;

pub use pointer::normalize_pointer;
pub use sampler::{InputSampler, PointerSample};
