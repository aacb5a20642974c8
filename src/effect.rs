use crate::DistanceFieldSampler;
use crate::Error;
use crate::Fragment;
use crate::TextureAccessConfig;
use crate::TextureHandle;
use glam::Vec4;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Every effect variant a program generator can be registered for.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, num_enum::IntoPrimitive, num_enum::TryFromPrimitive,
)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with_arbitrary", derive(arbitrary::Arbitrary))]
#[repr(u32)]
pub enum EffectKind {
    /// Input color modulated by smoothed distance field coverage.
    DistanceFieldTexture = 0,
}

impl EffectKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::DistanceFieldTexture => "DistanceFieldTexture",
        }
    }
}

/// Identifies which program generator matches an effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactoryToken(EffectKind);

impl FactoryToken {
    pub fn new(kind: EffectKind) -> Self {
        Self(kind)
    }

    pub fn kind(self) -> EffectKind {
        self.0
    }

    pub fn to_raw(self) -> u32 {
        self.0.into()
    }

    pub fn from_raw(raw: u32) -> Result<Self, Error> {
        EffectKind::try_from(raw)
            .map(Self)
            .map_err(|e| Error::UnknownEnumValue(e.number))
    }
}

bitflags::bitflags! {
    /// A set of RGBA channels.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ColorComponents: u32 {
        const R = 1 << 0;
        const G = 1 << 1;
        const B = 1 << 2;
        const A = 1 << 3;
        const RGBA = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

/// Everything a program generator needs to emit code for an effect.
///
/// Texture access is sampler state and does not change the program text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramKey {
    pub token: FactoryToken,
    pub bits: u32,
}

impl ProgramKey {
    pub const UNIFORM_SCALE: u32 = 1;

    pub fn has(&self, bit: u32) -> bool {
        self.bits & bit != 0
    }
}

/// A per-fragment coloring stage that a rasterizer runs for every covered fragment.
pub trait FragmentEffect: Send + Sync {
    /// Coverage in [0, 1] for one fragment.
    fn sample(&self, fragment: &Fragment) -> f32;

    /// Applies `coverage` to the incoming color.
    fn colorize(&self, input: Vec4, coverage: f32) -> Vec4;

    fn factory_token(&self) -> FactoryToken;

    fn program_key(&self) -> ProgramKey;

    fn shade(&self, fragment: &Fragment, input: Vec4) -> Vec4 {
        self.colorize(input, self.sample(fragment))
    }

    /// Called once per draw by the fragment loop with the number of fragments it shaded.
    fn record_draw(&self, _fragments: u64) {}
}

/// Modulates the input color by a sample from a distance field texture, smoothed
/// around the 0.5 boundary.
///
/// Immutable after construction. Holds a reference on its texture for as long as
/// it lives.
#[derive(Debug)]
pub struct EffectInstance {
    texture: TextureHandle,
    access: TextureAccessConfig,
    uniform_scale: bool,

    // diagnostics, ignored by equality
    label: Option<String>,
    fragments_shaded: AtomicU64,
}

impl EffectInstance {
    pub const NAME: &'static str = "DistanceFieldTexture";

    /// Binds a texture with its access configuration.
    ///
    /// `uniform_scale` promises the field is drawn at the scale it was built
    /// for, which allows a fixed smoothing width. Fails if there is no texture
    /// or it has no texels in either direction.
    pub fn create(
        texture: Option<&TextureHandle>,
        access: TextureAccessConfig,
        uniform_scale: bool,
    ) -> Result<Self, Error> {
        let Some(texture) = texture else {
            log::warn!("{} created without a texture", Self::NAME);
            return Err(Error::InvalidEffectConfig("missing texture"));
        };
        if !texture.field().is_drawable() {
            log::warn!(
                "{} created with a {}x{} texture",
                Self::NAME,
                texture.width(),
                texture.height()
            );
            return Err(Error::InvalidEffectConfig("zero sized texture"));
        }

        Ok(Self {
            texture: texture.clone(),
            access,
            uniform_scale,
            label: None,
            fragments_shaded: AtomicU64::new(0),
        })
    }

    /// Attaches a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn is_uniform_scale(&self) -> bool {
        self.uniform_scale
    }

    pub fn factory(&self) -> FactoryToken {
        FactoryToken::new(EffectKind::DistanceFieldTexture)
    }

    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    pub fn access(&self) -> TextureAccessConfig {
        self.access
    }

    pub fn sampler(&self) -> DistanceFieldSampler<'_> {
        DistanceFieldSampler::new(self.texture.field(), self.access)
    }

    /// Number of fragments shaded by the draws this effect was used in.
    pub fn fragments_shaded(&self) -> u64 {
        self.fragments_shaded.load(Ordering::Relaxed)
    }

    /// Which output channels are known without running the sampling pass.
    ///
    /// `valid` are the channels of `color` known on input. Coverage is only
    /// constant for a uniform field drawn at uniform scale; a varying field
    /// leaves nothing known.
    pub fn constant_color_components(
        &self,
        color: Vec4,
        valid: ColorComponents,
    ) -> (Vec4, ColorComponents) {
        let Some(value) = self.texture.field().uniform_value() else {
            return (color, ColorComponents::empty());
        };
        if !self.uniform_scale {
            return (color, ColorComponents::empty());
        }

        let width = dftex_sample::uniform_smoothing_width(self.texture.field().encoding().spread);
        let coverage = dftex_sample::coverage(value, width);
        if coverage == 0.0 {
            return (Vec4::ZERO, ColorComponents::RGBA);
        }
        (dftex_sample::colorize(color, coverage), valid)
    }
}

impl FragmentEffect for EffectInstance {
    fn sample(&self, fragment: &Fragment) -> f32 {
        self.sampler().sample(fragment, self.uniform_scale)
    }

    fn colorize(&self, input: Vec4, coverage: f32) -> Vec4 {
        dftex_sample::colorize(input, coverage)
    }

    fn factory_token(&self) -> FactoryToken {
        self.factory()
    }

    fn program_key(&self) -> ProgramKey {
        ProgramKey {
            token: self.factory(),
            bits: if self.uniform_scale {
                ProgramKey::UNIFORM_SCALE
            } else {
                0
            },
        }
    }

    fn record_draw(&self, fragments: u64) {
        self.fragments_shaded.fetch_add(fragments, Ordering::Relaxed);
    }
}

impl PartialEq for EffectInstance {
    fn eq(&self, other: &Self) -> bool {
        self.texture.same_texture(&other.texture)
            && self.access.to_bits() == other.access.to_bits()
            && self.uniform_scale == other.uniform_scale
    }
}

impl Eq for EffectInstance {}

impl Hash for EffectInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.texture.hash(state);
        self.access.to_bits().hash(state);
        self.uniform_scale.hash(state);
    }
}

#[cfg(feature = "with_arbitrary")]
impl EffectInstance {
    /// Builds a random effect over one of `textures`, for fuzzing effect caches and
    /// program generators.
    pub fn arbitrary_with(
        u: &mut arbitrary::Unstructured<'_>,
        textures: &[TextureHandle],
    ) -> arbitrary::Result<Self> {
        let texture = u.choose(textures)?;
        let access = u.arbitrary()?;
        let uniform_scale = u.arbitrary()?;
        Self::create(Some(texture), access, uniform_scale)
            .map_err(|_err| arbitrary::Error::IncorrectFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DistanceField;
    use crate::FieldEncoding;
    use dftex_sample::FilterMode;
    use dftex_sample::WrapMode;
    use glam::Vec2;
    use std::collections::HashSet;

    fn filled(value: u8) -> TextureHandle {
        let data = vec![value; 16];
        TextureHandle::new(DistanceField::from_a8([4, 4], data, FieldEncoding::default()).unwrap())
    }

    fn disc() -> TextureHandle {
        let center = Vec2::splat(16.0);
        let field = DistanceField::from_sdf(
            [32, 32],
            FieldEncoding::default(),
            crate::TexelFormat::A8,
            |pos| dftex_sample::sd_circle(pos, center, 10.0),
        )
        .unwrap();
        TextureHandle::new(field)
    }

    #[test]
    fn create_requires_a_texture() {
        let err = EffectInstance::create(None, TextureAccessConfig::default(), true);
        assert_eq!(err.unwrap_err(), Error::InvalidEffectConfig("missing texture"));
    }

    #[test]
    fn create_rejects_zero_sized_textures() {
        for size in [[0, 4], [4, 0], [0, 0]] {
            let field =
                DistanceField::from_a8(size, vec![], FieldEncoding::default()).unwrap();
            let texture = TextureHandle::new(field);
            let err = EffectInstance::create(Some(&texture), TextureAccessConfig::default(), false);
            assert!(matches!(err, Err(Error::InvalidEffectConfig(_))));
        }
    }

    #[test]
    fn queries() {
        let texture = filled(200);
        let effect =
            EffectInstance::create(Some(&texture), TextureAccessConfig::default(), true).unwrap();
        assert!(effect.is_uniform_scale());
        assert_eq!(effect.name(), "DistanceFieldTexture");
        assert_eq!(effect.factory().kind(), EffectKind::DistanceFieldTexture);
        assert_eq!(effect.factory().kind().name(), effect.name());
        assert_eq!(effect.program_key().bits, ProgramKey::UNIFORM_SCALE);
    }

    #[test]
    fn effects_hold_a_texture_reference() {
        let texture = filled(0);
        assert_eq!(texture.ref_count(), 1);
        let a = EffectInstance::create(Some(&texture), TextureAccessConfig::default(), true).unwrap();
        let b = EffectInstance::create(Some(&texture), TextureAccessConfig::default(), true).unwrap();
        assert_eq!(texture.ref_count(), 3);
        drop(a);
        assert_eq!(texture.ref_count(), 2);
        drop(b);
        assert_eq!(texture.ref_count(), 1);
    }

    #[test]
    fn equality() {
        let texture = filled(128);
        let other_texture = filled(128);
        let access = TextureAccessConfig::uniform(FilterMode::Bilinear, WrapMode::Clamp);

        let effect = |texture: &TextureHandle, access, uniform_scale| {
            EffectInstance::create(Some(texture), access, uniform_scale).unwrap()
        };

        let base = effect(&texture, access, true);
        assert_eq!(base, effect(&texture, access, true));

        // same texels, different texture
        assert_ne!(base, effect(&other_texture, access, true));
        let nearest = TextureAccessConfig::uniform(FilterMode::Nearest, WrapMode::Clamp);
        assert_ne!(base, effect(&texture, nearest, true));
        let repeat_y =
            TextureAccessConfig::new(FilterMode::Bilinear, WrapMode::Clamp, WrapMode::Repeat);
        assert_ne!(base, effect(&texture, repeat_y, true));
        assert_ne!(base, effect(&texture, access, false));
    }

    #[test]
    fn equality_ignores_diagnostics() {
        let texture = disc();
        let a = EffectInstance::create(Some(&texture), TextureAccessConfig::default(), false)
            .unwrap()
            .with_label("glyph atlas");
        let b = EffectInstance::create(Some(&texture), TextureAccessConfig::default(), false).unwrap();

        a.record_draw(16);
        assert_eq!(a.fragments_shaded(), 16);
        assert_eq!(b.fragments_shaded(), 0);
        assert_eq!(a.label(), Some("glyph atlas"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b), "dedup by structure");
    }

    #[test]
    fn shading_leaves_diagnostics_alone() {
        let texture = disc();
        let effect =
            EffectInstance::create(Some(&texture), TextureAccessConfig::default(), false).unwrap();
        for _ in 0..4 {
            effect.shade(&Fragment::new(Vec2::splat(0.5)), Vec4::ONE);
        }
        assert_eq!(effect.fragments_shaded(), 0);
    }

    #[test]
    fn white_input_yields_coverage() {
        let texture = disc();
        let effect =
            EffectInstance::create(Some(&texture), TextureAccessConfig::default(), true).unwrap();
        for uv in [Vec2::splat(0.5), Vec2::new(0.5, 0.2), Vec2::new(0.05, 0.05)] {
            let fragment = Fragment::new(uv);
            let c = effect.sample(&fragment);
            assert_eq!(effect.shade(&fragment, Vec4::ONE), Vec4::splat(c));
        }
        assert_eq!(effect.sample(&Fragment::new(Vec2::splat(0.5))), 1.0);
        assert_eq!(effect.sample(&Fragment::new(Vec2::new(0.05, 0.05))), 0.0);
    }

    #[test]
    fn nan_fragment_is_transparent() {
        let texture = filled(255);
        let effect =
            EffectInstance::create(Some(&texture), TextureAccessConfig::default(), false).unwrap();
        let fragment = Fragment::new(Vec2::new(f32::NAN, 0.5));
        for color in [Vec4::ONE, Vec4::new(0.1, 0.2, 0.3, 0.4)] {
            assert_eq!(effect.shade(&fragment, color), Vec4::ZERO);
        }
    }

    #[test]
    fn varying_field_has_no_constant_components() {
        let texture = disc();
        for uniform_scale in [true, false] {
            let effect =
                EffectInstance::create(Some(&texture), TextureAccessConfig::default(), uniform_scale)
                    .unwrap();
            let (_, valid) = effect.constant_color_components(Vec4::ONE, ColorComponents::RGBA);
            assert!(valid.is_empty());
        }
    }

    #[test]
    fn uniform_field_has_constant_components() {
        let inside = filled(255);
        let effect =
            EffectInstance::create(Some(&inside), TextureAccessConfig::default(), true).unwrap();
        let color = Vec4::new(0.5, 0.25, 1.0, 1.0);
        let (out, valid) = effect.constant_color_components(color, ColorComponents::A);
        assert_eq!(valid, ColorComponents::A);
        assert_eq!(out.w, 1.0);

        // fully outside: every channel ends up zero whatever the input
        let outside = filled(0);
        let effect =
            EffectInstance::create(Some(&outside), TextureAccessConfig::default(), true).unwrap();
        let (out, valid) = effect.constant_color_components(color, ColorComponents::empty());
        assert_eq!(valid, ColorComponents::RGBA);
        assert_eq!(out, Vec4::ZERO);

        // coverage still depends on derivatives
        let effect =
            EffectInstance::create(Some(&inside), TextureAccessConfig::default(), false).unwrap();
        let (_, valid) = effect.constant_color_components(color, ColorComponents::RGBA);
        assert!(valid.is_empty());
    }

    #[test]
    fn raw_tokens() {
        let token = FactoryToken::new(EffectKind::DistanceFieldTexture);
        assert_eq!(FactoryToken::from_raw(token.to_raw()), Ok(token));
        assert_eq!(FactoryToken::from_raw(99), Err(Error::UnknownEnumValue(99)));
    }
}
