use crate::DistanceField;
use crate::Error;
use dftex_sample::FilterMode;
use dftex_sample::WrapMode;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

/// Filtering and per-axis wrap modes used when sampling a distance field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with_speedy", derive(speedy::Writable, speedy::Readable))]
#[cfg_attr(feature = "with_arbitrary", derive(arbitrary::Arbitrary))]
pub struct TextureAccessConfig {
    pub filter: FilterMode,
    pub wrap_x: WrapMode,
    pub wrap_y: WrapMode,
}

impl TextureAccessConfig {
    pub fn new(filter: FilterMode, wrap_x: WrapMode, wrap_y: WrapMode) -> Self {
        Self {
            filter,
            wrap_x,
            wrap_y,
        }
    }

    /// Same wrap mode on both axes.
    pub fn uniform(filter: FilterMode, wrap: WrapMode) -> Self {
        Self::new(filter, wrap, wrap)
    }

    /// Packs the config into one word: filter in bits 0-7, wrap x in 8-15, wrap y in 16-23.
    pub fn to_bits(self) -> u32 {
        let filter: u32 = self.filter.into();
        let wrap_x: u32 = self.wrap_x.into();
        let wrap_y: u32 = self.wrap_y.into();
        filter | (wrap_x << 8) | (wrap_y << 16)
    }

    pub fn from_bits(bits: u32) -> Result<Self, Error> {
        if bits >> 24 != 0 {
            return Err(Error::UnknownEnumValue(bits));
        }
        let unknown = Error::UnknownEnumValue;
        let filter = FilterMode::try_from(bits & 0xff).map_err(|e| unknown(e.number))?;
        let wrap_x = WrapMode::try_from((bits >> 8) & 0xff).map_err(|e| unknown(e.number))?;
        let wrap_y = WrapMode::try_from((bits >> 16) & 0xff).map_err(|e| unknown(e.number))?;
        Ok(Self::new(filter, wrap_x, wrap_y))
    }
}

/// Shared read-only access to a [`DistanceField`].
///
/// Every clone holds a reference on the field; the field is freed when the
/// last handle goes away. Two handles are the same texture only if they share
/// the allocation, regardless of texel contents.
#[derive(Clone, Debug)]
pub struct TextureHandle(Arc<DistanceField>);

impl TextureHandle {
    pub fn new(field: DistanceField) -> Self {
        Self(Arc::new(field))
    }

    pub fn field(&self) -> &DistanceField {
        &self.0
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Number of live references to the underlying field.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub fn same_texture(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable for the lifetime of the texture, used for hashing.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl From<DistanceField> for TextureHandle {
    fn from(field: DistanceField) -> Self {
        Self::new(field)
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_texture(other)
    }
}

impl Eq for TextureHandle {}

impl Hash for TextureHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldEncoding;

    fn field() -> DistanceField {
        DistanceField::from_a8([2, 2], vec![0, 64, 128, 255], FieldEncoding::default()).unwrap()
    }

    #[test]
    fn bits_round_trip() {
        for filter in [FilterMode::Nearest, FilterMode::Bilinear] {
            for wrap_x in [WrapMode::Clamp, WrapMode::Repeat, WrapMode::Mirror] {
                let config = TextureAccessConfig::new(filter, wrap_x, WrapMode::Mirror);
                assert_eq!(TextureAccessConfig::from_bits(config.to_bits()), Ok(config));
            }
        }
    }

    #[test]
    fn unknown_bits_are_rejected() {
        assert_eq!(
            TextureAccessConfig::from_bits(7),
            Err(Error::UnknownEnumValue(7))
        );
        assert_eq!(
            TextureAccessConfig::from_bits(3 << 8),
            Err(Error::UnknownEnumValue(3))
        );
        assert_eq!(
            TextureAccessConfig::from_bits(1 << 24),
            Err(Error::UnknownEnumValue(1 << 24))
        );
    }

    #[test]
    fn identity_is_the_allocation() {
        let a = TextureHandle::new(field());
        let b = TextureHandle::new(field());
        assert_eq!(a.field(), b.field());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn clones_hold_references() {
        let a = TextureHandle::new(field());
        assert_eq!(a.ref_count(), 1);
        let b = a.clone();
        assert_eq!(a.ref_count(), 2);
        drop(b);
        assert_eq!(a.ref_count(), 1);
    }
}
