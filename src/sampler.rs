use crate::DistanceField;
use crate::TextureAccessConfig;
use dftex_sample::FilterMode;
use glam::Vec2;

/// One fragment's texture coordinate and its screen-space derivatives.
///
/// All in normalized texture coordinates: (0, 0) is the top left corner of the
/// field and (1, 1) the bottom right.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fragment {
    pub uv: Vec2,
    /// Change of `uv` to the next fragment to the right.
    pub ddx: Vec2,
    /// Change of `uv` to the next fragment below.
    pub ddy: Vec2,
}

impl Fragment {
    /// A fragment without derivative information.
    pub fn new(uv: Vec2) -> Self {
        Self {
            uv,
            ddx: Vec2::ZERO,
            ddy: Vec2::ZERO,
        }
    }

    pub fn with_derivatives(uv: Vec2, ddx: Vec2, ddy: Vec2) -> Self {
        Self { uv, ddx, ddy }
    }

    pub fn is_finite(&self) -> bool {
        self.uv.is_finite() && self.ddx.is_finite() && self.ddy.is_finite()
    }
}

/// Samples a distance field with a fixed access configuration and turns the
/// filtered value into coverage.
#[derive(Copy, Clone, Debug)]
pub struct DistanceFieldSampler<'a> {
    field: &'a DistanceField,
    access: TextureAccessConfig,
}

impl<'a> DistanceFieldSampler<'a> {
    pub fn new(field: &'a DistanceField, access: TextureAccessConfig) -> Self {
        Self { field, access }
    }

    pub fn field(&self) -> &'a DistanceField {
        self.field
    }

    pub fn access(&self) -> TextureAccessConfig {
        self.access
    }

    /// Filtered field value at `uv`.
    ///
    /// Each axis is wrapped into [0, 1] first, then neighbor texels are wrapped
    /// again on the lattice. Wrapping is exact only up to float precision: with
    /// `Repeat`, `1.0 + eps` and `eps` can fetch values a few ulps apart. Returns NaN for a non-finite coordinate or a field
    /// without texels.
    pub fn fetch(&self, uv: Vec2) -> f32 {
        if !uv.is_finite() || !self.field.is_drawable() {
            return f32::NAN;
        }

        let [w, h] = self.field.size();
        let u = self.access.wrap_x.resolve_coord(uv.x);
        let v = self.access.wrap_y.resolve_coord(uv.y);
        let p = Vec2::new(u * w as f32, v * h as f32);

        match self.access.filter {
            FilterMode::Nearest => self.texel(p.x.floor() as i32, p.y.floor() as i32),
            FilterMode::Bilinear => {
                // texel centers are at half-integers
                let p = p - Vec2::splat(0.5);
                let p0 = p.floor();
                let t = p - p0;
                let (x0, y0) = (p0.x as i32, p0.y as i32);

                let top = lerp(self.texel(x0, y0), self.texel(x0 + 1, y0), t.x);
                let bottom = lerp(self.texel(x0, y0 + 1), self.texel(x0 + 1, y0 + 1), t.x);
                lerp(top, bottom, t.y)
            }
        }
    }

    /// Smoothing half-width for `fragment`, in field value units.
    pub fn smoothing_width(&self, fragment: &Fragment, uniform_scale: bool) -> f32 {
        let spread = self.field.encoding().spread;
        if uniform_scale {
            dftex_sample::uniform_smoothing_width(spread)
        } else {
            let [w, h] = self.field.size();
            let texels_per_uv = Vec2::new(w as f32, h as f32);
            dftex_sample::derivative_smoothing_width(
                spread,
                fragment.ddx * texels_per_uv,
                fragment.ddy * texels_per_uv,
            )
        }
    }

    /// Coverage at `uv` for an explicit smoothing half-width.
    pub fn coverage(&self, uv: Vec2, width: f32) -> f32 {
        dftex_sample::coverage(self.fetch(uv), width)
    }

    /// Coverage of `fragment`, with the smoothing width picked by `uniform_scale`.
    ///
    /// Malformed fragments (any NaN or infinite component) are not covered.
    pub fn sample(&self, fragment: &Fragment, uniform_scale: bool) -> f32 {
        if !fragment.is_finite() {
            return 0.0;
        }
        self.coverage(fragment.uv, self.smoothing_width(fragment, uniform_scale))
    }

    #[inline]
    fn texel(&self, x: i32, y: i32) -> f32 {
        let x = self.access.wrap_x.resolve_texel(x, self.field.width());
        let y = self.access.wrap_y.resolve_texel(y, self.field.height());
        self.field.texel([x, y])
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
