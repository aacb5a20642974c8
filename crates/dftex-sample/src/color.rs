use glam::Vec4;

/// Modulates `input` (premultiplied RGBA) by `coverage`, alpha included.
///
/// Coverage is clamped to [0, 1]; non-finite coverage counts as 0.
#[inline]
pub fn colorize(input: Vec4, coverage: f32) -> Vec4 {
    let coverage = if coverage.is_finite() {
        coverage.clamp(0.0, 1.0)
    } else {
        0.0
    };
    input * coverage
}
