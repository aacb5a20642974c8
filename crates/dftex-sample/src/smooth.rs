//! Smoothing width and coverage.
//!
//! Field values are normalized to [0, 1] with the shape boundary at
//! [`FIELD_THRESHOLD`]. Values above the threshold are inside the shape.

use glam::Vec2;
#[cfg(target_arch = "spirv")]
use num_traits::Float;

/// Field value of the shape boundary.
pub const FIELD_THRESHOLD: f32 = 0.5;

/// Smoothing half-width per texel of footprint: half a pixel diagonal.
pub const AA_FACTOR: f32 = 0.7071;

/// Lower bound on the smoothing half-width, so the smoothstep never divides by zero.
pub const MIN_SMOOTHING_WIDTH: f32 = 1e-4;

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// How much the field value changes per texel for a field whose values saturate
/// `spread` texels away from the boundary.
#[inline]
pub fn value_per_texel(spread: f32) -> f32 {
    0.5 / spread
}

/// Smoothing half-width for a field drawn at the scale it was built for:
/// one texel per fragment.
#[inline]
pub fn uniform_smoothing_width(spread: f32) -> f32 {
    (AA_FACTOR * value_per_texel(spread)).max(MIN_SMOOTHING_WIDTH)
}

/// Smoothing half-width estimated from screen-space derivatives.
///
/// `ddx_texels` and `ddy_texels` are the change of the texel-space coordinate
/// between horizontally and vertically adjacent fragments. The footprint is
/// their RMS length, which keeps the antialiased edge about one pixel wide at any
/// zoom and stays stable under rotation.
#[inline]
pub fn derivative_smoothing_width(spread: f32, ddx_texels: Vec2, ddy_texels: Vec2) -> f32 {
    let footprint = (0.5 * (ddx_texels.length_squared() + ddy_texels.length_squared())).sqrt();
    (AA_FACTOR * footprint * value_per_texel(spread)).max(MIN_SMOOTHING_WIDTH)
}

/// Coverage of a fragment whose filtered field value is `value`.
///
/// Returns 0 for a non-finite value or width.
#[inline]
pub fn coverage(value: f32, width: f32) -> f32 {
    if !value.is_finite() || !width.is_finite() {
        return 0.0;
    }
    let w = width.max(MIN_SMOOTHING_WIDTH);
    smoothstep(FIELD_THRESHOLD - w, FIELD_THRESHOLD + w, value)
}
