//! Distance field texture effect: antialiased coverage for glyphs and vector
//! shapes drawn from precomputed distance textures.
//!
//! A [`DistanceField`] is shared through a [`TextureHandle`] and bound to an
//! [`EffectInstance`] together with its [`TextureAccessConfig`]. The effect
//! samples the field, smooths the result around the 0.5 boundary and modulates
//! the input color by that coverage.

// crate-specific exceptions:
#![forbid(unsafe_code)]

pub use dftex_sample::*;

mod error;
pub use error::*;

mod field;
pub use field::*;

mod texture;
pub use texture::*;

mod sampler;
pub use sampler::*;

mod effect;
pub use effect::*;

mod registry;
pub use registry::*;

mod codegen;
pub use codegen::*;

pub mod render;
