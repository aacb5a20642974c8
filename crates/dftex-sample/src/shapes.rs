//! 2D signed distance functions for building distance field textures.
//!
//! Distances are negative inside the shape.

#![allow(missing_docs, clippy::manual_clamp)]

use glam::*;
#[cfg(target_arch = "spirv")]
use num_traits::Float;

#[inline]
pub fn sd_circle(pos: Vec2, center: Vec2, radius: f32) -> f32 {
    (pos - center).length() - radius
}

#[inline]
pub fn sd_rounded_box(pos: Vec2, center: Vec2, half_size: Vec2, rounding_radius: f32) -> f32 {
    let q = (pos - center).abs() - half_size + Vec2::splat(rounding_radius);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - rounding_radius
}

/// A stroked line segment with round caps.
#[inline]
pub fn sd_capsule(pos: Vec2, points: &[Vec2; 2], radius: f32) -> f32 {
    let pa = pos - points[0];
    let ba = points[1] - points[0];
    let h = (pa.dot(ba) / ba.dot(ba)).clamp(0.0, 1.0);
    (pa - ba * h).length() - radius
}

/// An annulus centered on `center`, `thickness` wide around `radius`.
#[inline]
pub fn sd_ring(pos: Vec2, center: Vec2, radius: f32, thickness: f32) -> f32 {
    sd_circle(pos, center, radius).abs() - 0.5 * thickness
}

#[inline]
pub fn sd_op_union(d1: f32, d2: f32) -> f32 {
    d1.min(d2)
}

#[inline]
pub fn sd_op_subtract(d1: f32, d2: f32) -> f32 {
    (-d1).max(d2)
}

#[inline]
pub fn sd_op_intersect(d1: f32, d2: f32) -> f32 {
    d1.max(d2)
}

#[inline]
pub fn sd_op_union_smooth(d1: f32, d2: f32, size: f32) -> f32 {
    let h = (0.5 + 0.5 * (d2 - d1) / size).clamp(0.0, 1.0);
    d2 + (d1 - d2) * h - size * h * (1.0 - h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle() {
        assert_eq!(sd_circle(Vec2::ZERO, Vec2::ZERO, 2.0), -2.0);
        assert_eq!(sd_circle(Vec2::new(3.0, 0.0), Vec2::ZERO, 2.0), 1.0);
    }

    #[test]
    fn rounded_box() {
        let d = sd_rounded_box(Vec2::new(3.0, 0.0), Vec2::ZERO, Vec2::splat(2.0), 0.0);
        assert_eq!(d, 1.0);
        let d = sd_rounded_box(Vec2::ZERO, Vec2::ZERO, Vec2::splat(2.0), 0.5);
        assert_eq!(d, -2.0);
    }

    #[test]
    fn capsule_and_ring() {
        let points = [Vec2::ZERO, Vec2::new(4.0, 0.0)];
        assert_eq!(sd_capsule(Vec2::new(2.0, 3.0), &points, 1.0), 2.0);
        assert_eq!(sd_ring(Vec2::new(5.0, 0.0), Vec2::ZERO, 5.0, 2.0), -1.0);
    }

    #[test]
    fn combinators() {
        assert_eq!(sd_op_union(1.0, -2.0), -2.0);
        assert_eq!(sd_op_intersect(1.0, -2.0), 1.0);
        assert_eq!(sd_op_subtract(-1.0, -2.0), 1.0);
        assert!(sd_op_union_smooth(1.0, 1.0, 0.5) < 1.0);
    }
}
