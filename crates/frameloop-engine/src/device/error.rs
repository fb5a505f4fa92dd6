/// Outcome of recovering from a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Swapchain was reconfigured; the next frame should succeed.
    Reconfigured,
    /// Transient failure; drop this frame.
    SkipFrame,
    /// Device is out of memory; rendering cannot continue.
    Fatal,
}
