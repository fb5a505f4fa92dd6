use crate::coords::Vec2;

use super::sampler::PointerSample;

/// Maps a window-space pointer position to `[-1, 1]` on both axes.
///
/// The Y axis is flipped: the top edge maps to `+1`, the bottom edge to `-1`.
/// Degenerate dimensions are treated as one pixel so the result stays finite.
/// Positions outside the window (reported while a drag holds the cursor) are
/// clamped to the edge.
pub fn normalize_pointer(sample: PointerSample, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;

    Vec2::new(
        (2.0 * (sample.client_x / w) - 1.0).clamp(-1.0, 1.0),
        (2.0 * (1.0 - sample.client_y / h) - 1.0).clamp(-1.0, 1.0),
    )
}
