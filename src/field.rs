use crate::Error;
use glam::Vec2;

/// Texel size as `[width, height]`.
pub type Size2 = [u32; 2];

/// How signed distances were mapped into [0, 1] when the field was built.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with_speedy", derive(speedy::Writable, speedy::Readable))]
#[cfg_attr(feature = "with_arbitrary", derive(arbitrary::Arbitrary))]
pub struct FieldEncoding {
    /// Distance in texels from the boundary at which the encoded value saturates
    /// to 0 (outside) or 1 (inside).
    pub spread: f32,
}

impl Default for FieldEncoding {
    fn default() -> Self {
        Self { spread: 4.0 }
    }
}

impl FieldEncoding {
    /// A usable encoding has a finite, positive spread.
    pub fn is_valid(&self) -> bool {
        self.spread.is_finite() && self.spread > 0.0
    }

    /// Encodes a signed distance in texels (negative inside) as a field value.
    #[inline]
    pub fn encode(&self, distance: f32) -> f32 {
        (0.5 - 0.5 * distance / self.spread).clamp(0.0, 1.0)
    }

    /// Inverse of [`Self::encode`] for unsaturated values.
    #[inline]
    pub fn decode(&self, value: f32) -> f32 {
        (0.5 - value) * 2.0 * self.spread
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TexelFormat {
    /// 8-bit, value = byte / 255.
    A8,
    F32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Texels {
    A8(Vec<u8>),
    F32(Vec<f32>),
}

impl Texels {
    pub fn len(&self) -> usize {
        match self {
            Self::A8(data) => data.len(),
            Self::F32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> TexelFormat {
        match self {
            Self::A8(_) => TexelFormat::A8,
            Self::F32(_) => TexelFormat::F32,
        }
    }

    #[inline]
    fn get(&self, index: usize) -> f32 {
        match self {
            Self::A8(data) => f32::from(data[index]) / 255.0,
            Self::F32(data) => data[index],
        }
    }
}

/// A single channel distance field stored on the texel lattice
/// \[0, 0\] - \[w-1, h-1\], row major.
///
/// Values are in [0, 1] with the shape boundary at 0.5 and the inside above it.
/// Immutable once built.
#[derive(Clone, Debug)]
pub struct DistanceField {
    size: Size2,
    texels: Texels,
    encoding: FieldEncoding,
    /// Set when every texel holds the same value.
    uniform_value: Option<f32>,
}

impl PartialEq for DistanceField {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.texels == other.texels && self.encoding == other.encoding
    }
}

impl DistanceField {
    /// Wraps already encoded texels, validating their count, their range and the
    /// encoding.
    ///
    /// A zero sized field is allowed here; effects refuse to draw with one.
    pub fn new(size: Size2, texels: Texels, encoding: FieldEncoding) -> Result<Self, Error> {
        if !encoding.is_valid() {
            log::warn!("Rejecting distance field: spread {}", encoding.spread);
            return Err(Error::InvalidFieldEncoding);
        }

        let expected = size[0] as usize * size[1] as usize;
        if texels.len() != expected {
            return Err(Error::FieldSizeMismatch {
                expected,
                actual: texels.len(),
            });
        }

        if let Texels::F32(data) = &texels {
            if let Some(index) = data
                .iter()
                .position(|v| !v.is_finite() || !(0.0..=1.0).contains(v))
            {
                log::warn!("Rejecting distance field: bad value at texel {}", index);
                return Err(Error::FieldValueOutOfRange { index });
            }
        }

        let uniform_value = if texels.is_empty() {
            None
        } else {
            let first = texels.get(0);
            (1..texels.len())
                .all(|i| texels.get(i) == first)
                .then_some(first)
        };

        Ok(Self {
            size,
            texels,
            encoding,
            uniform_value,
        })
    }

    pub fn from_a8(size: Size2, data: Vec<u8>, encoding: FieldEncoding) -> Result<Self, Error> {
        Self::new(size, Texels::A8(data), encoding)
    }

    pub fn from_f32(size: Size2, data: Vec<f32>, encoding: FieldEncoding) -> Result<Self, Error> {
        Self::new(size, Texels::F32(data), encoding)
    }

    /// Builds a field by evaluating `sd` at every texel center.
    ///
    /// `sd` takes a position in texel units and returns the signed distance in
    /// texels, negative inside.
    pub fn from_sdf(
        size: Size2,
        encoding: FieldEncoding,
        format: TexelFormat,
        sd: impl Fn(Vec2) -> f32 + Send + Sync,
    ) -> Result<Self, Error> {
        if !encoding.is_valid() {
            return Err(Error::InvalidFieldEncoding);
        }
        let values = Self::evaluate_rows(size, |pos| encoding.encode(sd(pos)));

        let texels = match format {
            TexelFormat::F32 => Texels::F32(values),
            // NaN saturates to 0 in the cast, so check before quantizing.
            TexelFormat::A8 => {
                if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                    return Err(Error::FieldValueOutOfRange { index });
                }
                Texels::A8(values.iter().map(|v| (v * 255.0).round() as u8).collect())
            }
        };

        log::debug!(
            "Built {}x{} {:?} distance field (spread {})",
            size[0],
            size[1],
            format,
            encoding.spread
        );
        Self::new(size, texels, encoding)
    }

    #[cfg(not(feature = "with_rayon"))]
    fn evaluate_rows(size: Size2, f: impl Fn(Vec2) -> f32 + Send + Sync) -> Vec<f32> {
        let w = size[0] as usize;
        let mut values = vec![0.0; w * size[1] as usize];
        if w == 0 {
            return values;
        }
        values.chunks_mut(w).enumerate().for_each(|(y, row)| {
            Self::evaluate_row(row, y, &f);
        });
        values
    }

    #[cfg(feature = "with_rayon")]
    fn evaluate_rows(size: Size2, f: impl Fn(Vec2) -> f32 + Send + Sync) -> Vec<f32> {
        use rayon::prelude::*;

        let w = size[0] as usize;
        let mut values = vec![0.0; w * size[1] as usize];
        if w == 0 {
            return values;
        }
        values.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            Self::evaluate_row(row, y, &f);
        });
        values
    }

    fn evaluate_row(row: &mut [f32], y: usize, f: impl Fn(Vec2) -> f32) {
        for (x, value) in row.iter_mut().enumerate() {
            *value = f(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
        }
    }

    pub fn width(&self) -> u32 {
        self.size[0]
    }

    pub fn height(&self) -> u32 {
        self.size[1]
    }

    pub fn size(&self) -> Size2 {
        self.size
    }

    pub fn encoding(&self) -> FieldEncoding {
        self.encoding
    }

    pub fn format(&self) -> TexelFormat {
        self.texels.format()
    }

    pub fn texels(&self) -> &Texels {
        &self.texels
    }

    /// At least one texel in each direction.
    pub fn is_drawable(&self) -> bool {
        self.size[0] > 0 && self.size[1] > 0
    }

    /// The shared value when every texel is the same.
    pub fn uniform_value(&self) -> Option<f32> {
        self.uniform_value
    }

    /// Value of the texel at `[x, y]`. Coordinate must be within the field.
    #[inline]
    pub fn texel(&self, p: [u32; 2]) -> f32 {
        debug_assert!(p[0] < self.size[0]);
        debug_assert!(p[1] < self.size[1]);
        self.texels.get(p[0] as usize + self.size[0] as usize * p[1] as usize)
    }

    #[cfg(feature = "with_bincode")]
    pub fn as_bytes(&self) -> Result<Vec<u8>, std::boxed::Box<bincode::ErrorKind>> {
        bincode::serialize(&(self.size, &self.texels, self.encoding))
    }

    /// Deserializes and re-validates a field written by [`Self::as_bytes`].
    #[cfg(feature = "with_bincode")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FromBytesError> {
        let (size, texels, encoding): (Size2, Texels, FieldEncoding) =
            bincode::deserialize(bytes)?;
        Ok(Self::new(size, texels, encoding)?)
    }
}

#[cfg(feature = "with_bincode")]
#[derive(thiserror::Error, Debug)]
pub enum FromBytesError {
    #[error("Failed to decode distance field: {0}")]
    Decode(#[from] std::boxed::Box<bincode::ErrorKind>),

    #[error(transparent)]
    Invalid(#[from] Error),
}
