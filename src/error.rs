use crate::FactoryToken;

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid effect configuration: {0}")]
    InvalidEffectConfig(&'static str),

    #[error("Distance field expected {expected} texels, got {actual}")]
    FieldSizeMismatch { expected: usize, actual: usize },

    #[error("Distance field spread must be finite and greater than zero")]
    InvalidFieldEncoding,

    #[error("Distance field value at texel {index} is not a finite value in [0, 1]")]
    FieldValueOutOfRange { index: usize },

    #[error("Unknown raw enum value: {0}")]
    UnknownEnumValue(u32),

    #[error("No effect registered for {0:?}")]
    UnknownEffect(FactoryToken),

    #[error("An effect is already registered for {0:?}")]
    DuplicateEffect(FactoryToken),
}
