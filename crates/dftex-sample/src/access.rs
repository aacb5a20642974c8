//! Texture access modes and the coordinate resolution they imply.

#[cfg(target_arch = "spirv")]
use num_traits::Float;

/// How texels are combined when a coordinate falls between texel centers.
#[derive(Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(
    feature = "with_enum_derives",
    derive(Debug, Hash, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)
)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with_speedy", derive(speedy::Writable, speedy::Readable))]
#[cfg_attr(feature = "with_arbitrary", derive(arbitrary::Arbitrary))]
#[repr(u32)]
pub enum FilterMode {
    /// Single texel, the one whose cell contains the coordinate.
    Nearest = 0,
    /// Weighted average of the four surrounding texels.
    #[default]
    Bilinear = 1,
}

/// What happens to a coordinate outside of [0, 1] on one axis.
#[derive(Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(
    feature = "with_enum_derives",
    derive(Debug, Hash, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)
)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with_speedy", derive(speedy::Writable, speedy::Readable))]
#[cfg_attr(feature = "with_arbitrary", derive(arbitrary::Arbitrary))]
#[repr(u32)]
pub enum WrapMode {
    #[default]
    Clamp = 0,
    Repeat = 1,
    Mirror = 2,
}

impl WrapMode {
    /// Resolves a normalized coordinate into [0, 1].
    #[inline]
    pub fn resolve_coord(self, t: f32) -> f32 {
        match self {
            Self::Clamp => t.clamp(0.0, 1.0),
            Self::Repeat => t - t.floor(),
            Self::Mirror => {
                let t = t - 2.0 * (t * 0.5).floor(); // [0, 2)
                1.0 - (t - 1.0).abs()
            }
        }
    }

    /// Resolves a (possibly out of range) texel index on an axis with `size` texels.
    ///
    /// `size` must be non-zero.
    #[inline]
    pub fn resolve_texel(self, i: i32, size: u32) -> u32 {
        let size = size as i32;
        let resolved = match self {
            Self::Clamp => i.clamp(0, size - 1),
            Self::Repeat => i.rem_euclid(size),
            Self::Mirror => {
                let i = i.rem_euclid(2 * size);
                if i >= size {
                    2 * size - 1 - i
                } else {
                    i
                }
            }
        };
        resolved as u32
    }
}
