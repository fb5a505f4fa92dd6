use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// The host offers no repaint-aligned frame scheduler.
    #[error("platform provides no frame scheduler (request/cancel animation frame)")]
    SchedulerUnavailable,

    /// Attempted write to a derived, read-only property.
    #[error("the \"{property}\" property is read-only")]
    ReadOnlyProperty { property: &'static str },
}
