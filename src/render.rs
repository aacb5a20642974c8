//! A minimal fragment loop: runs an effect over every pixel of a target.
//!
//! Handy for tests, benchmarks and previews. Pixel (x, y) is sampled at
//! `(x, y) + sample_offset` and mapped into texture space by an affine
//! transform, so the derivatives are the same for every fragment.

use crate::Fragment;
use crate::FragmentEffect;
use glam::Affine2;
use glam::Vec2;
use glam::Vec4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderOptions {
    /// Where inside a pixel the effect is evaluated. (0.5, 0.5) is the center.
    pub sample_offset: Vec2,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sample_offset: Vec2::splat(0.5),
        }
    }
}

/// Shades every pixel of `target` with `effect`, returning row major colors.
pub fn render(
    effect: &dyn FragmentEffect,
    target: RenderTarget,
    uv_from_pixel: Affine2,
    color: Vec4,
    options: &RenderOptions,
) -> Vec<Vec4> {
    let w = target.width as usize;
    let mut pixels = vec![Vec4::ZERO; w * target.height as usize];
    if pixels.is_empty() {
        return pixels;
    }

    let ddx = uv_from_pixel.transform_vector2(Vec2::X);
    let ddy = uv_from_pixel.transform_vector2(Vec2::Y);
    let shade_row = |y: usize, row: &mut [Vec4]| {
        for (x, pixel) in row.iter_mut().enumerate() {
            let pos = Vec2::new(x as f32, y as f32) + options.sample_offset;
            let fragment = Fragment::with_derivatives(uv_from_pixel.transform_point2(pos), ddx, ddy);
            *pixel = effect.shade(&fragment, color);
        }
    };

    #[cfg(feature = "with_rayon")]
    {
        use rayon::prelude::*;

        pixels
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| shade_row(y, row));
    }

    #[cfg(not(feature = "with_rayon"))]
    {
        pixels
            .chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| shade_row(y, row));
    }

    effect.record_draw(pixels.len() as u64);
    log::debug!(
        "Rendered {}x{} fragments for {:?}",
        target.width,
        target.height,
        effect.factory_token()
    );
    pixels
}
