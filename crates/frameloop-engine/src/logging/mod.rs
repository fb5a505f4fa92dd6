//! Logging setup.
//!
//! The engine logs through the `log` facade only; binaries pick the backend.
//! `init_logging` wires `env_logger` for the common case.

mod init;

pub use init::{init_logging, LoggingConfig};
