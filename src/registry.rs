use crate::CodeGen;
use crate::EffectKind;
use crate::Error;
use crate::FactoryToken;
use crate::FragmentEffect;
use crate::GeneratedProgram;
use crate::ProgramBuilder;
use ahash::AHashMap;

pub struct RegisteredEffect {
    pub name: &'static str,
    pub builder: Box<dyn ProgramBuilder>,
}

/// Maps factory tokens to the program builders that can generate their shaders.
///
/// Owned by whoever drives program generation and passed around by reference;
/// there is no process wide instance.
#[derive(Default)]
pub struct EffectRegistry {
    effects: AHashMap<FactoryToken, RegisteredEffect>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every effect this crate implements, generating GLSL.
    pub fn with_builtin_effects() -> Self {
        let mut registry = Self::new();
        let kind = EffectKind::DistanceFieldTexture;
        let registered =
            registry.register(FactoryToken::new(kind), kind.name(), Box::new(CodeGen::glsl()));
        debug_assert_eq!(registered, Ok(()));
        registry
    }

    pub fn register(
        &mut self,
        token: FactoryToken,
        name: &'static str,
        builder: Box<dyn ProgramBuilder>,
    ) -> Result<(), Error> {
        if self.effects.contains_key(&token) {
            return Err(Error::DuplicateEffect(token));
        }
        log::debug!("Registering program builder for {} ({:?})", name, token);
        self.effects.insert(token, RegisteredEffect { name, builder });
        Ok(())
    }

    pub fn lookup(&self, token: FactoryToken) -> Option<&RegisteredEffect> {
        self.effects.get(&token)
    }

    pub fn name_of(&self, token: FactoryToken) -> Option<&'static str> {
        self.lookup(token).map(|effect| effect.name)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Generates the program for `effect` with the builder registered for its token.
    pub fn generate(&self, effect: &dyn FragmentEffect) -> Result<GeneratedProgram, Error> {
        let token = effect.factory_token();
        let registered = self.lookup(token).ok_or(Error::UnknownEffect(token))?;
        Ok(registered.builder.build(effect.program_key()))
    }
}
