use std::time::Duration;

/// Application construction options.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Register the uniform declaration chunk (`frameloop_uniforms`) with the
    /// global shader-chunk registry during construction.
    pub add_shader_chunk: bool,

    /// Optional cap on the `delta` reported by `update` events. `None` reports
    /// the measured time, so deltas sum to `elapsed_time`.
    pub max_delta: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            add_shader_chunk: true,
            max_delta: None,
        }
    }
}
