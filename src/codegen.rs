use crate::EffectKind;
use crate::ProgramKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Backend {
    GLSL,
}

/// Shader source for one effect configuration. Compiling it is up to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedProgram {
    pub key: ProgramKey,
    pub vertex: String,
    pub fragment: String,
}

/// Emits the program an effect needs, given its [`ProgramKey`].
pub trait ProgramBuilder: Send + Sync {
    fn build(&self, key: ProgramKey) -> GeneratedProgram;
}

/// Names the generated code exposes to the host.
pub mod names {
    /// Texture coordinate vertex attribute, normalized.
    pub const ATTRIBUTE_UV: &str = "a_dftex_uv";
    /// Input color vertex attribute, premultiplied.
    pub const ATTRIBUTE_COLOR: &str = "a_dftex_color";
    pub const UNIFORM_TEXTURE: &str = "u_dftex_texture";
    /// Field size in texels.
    pub const UNIFORM_SIZE: &str = "u_dftex_size";
    /// `FieldEncoding::spread` of the bound field.
    pub const UNIFORM_SPREAD: &str = "u_dftex_spread";
    pub const OUTPUT_COLOR: &str = "o_dftex_color";
}

pub struct CodeGen {
    backend: Backend,
}

impl CodeGen {
    /// First line of every generated stage; the code relies on `in`/`out`,
    /// `isnan`/`isinf` and `texture()`.
    pub const GLSL_VERSION: &'static str = "#version 330 core";

    pub fn glsl() -> Self {
        Self {
            backend: Backend::GLSL,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    // Code shared by every generated fragment stage
    pub fn get_library_code(&self) -> &'static str {
        match self.backend {
            Backend::GLSL => dftex_sample::get_glsl_library_code(),
        }
    }

    fn build_glsl_vertex(kind: EffectKind) -> String {
        use self::names::*;
        use std::fmt::Write;

        let mut code = String::new();
        let _ = writeln!(&mut code, "{}", Self::GLSL_VERSION);
        code.push_str("// !!! START OF GENERATED CODE !!!\n");
        let _ = writeln!(&mut code, "// {} vertex stage", kind.name());
        let _ = writeln!(&mut code, "in vec2 a_position;");
        let _ = writeln!(&mut code, "in vec2 {};", ATTRIBUTE_UV);
        let _ = writeln!(&mut code, "in vec4 {};", ATTRIBUTE_COLOR);
        code.push_str("out vec2 v_dftex_uv;\n");
        code.push_str("out vec4 v_dftex_color;\n");
        code.push_str("uniform mat3 u_view_matrix;\n\n");
        code.push_str("void main() {\n");
        let _ = writeln!(&mut code, "\tv_dftex_uv = {};", ATTRIBUTE_UV);
        let _ = writeln!(&mut code, "\tv_dftex_color = {};", ATTRIBUTE_COLOR);
        code.push_str("\tvec3 pos = u_view_matrix * vec3(a_position, 1.0);\n");
        code.push_str("\tgl_Position = vec4(pos.xy, 0.0, pos.z);\n");
        code.push_str("}\n");
        code.push_str("// !!! END OF GENERATED CODE !!!\n");
        code
    }

    fn build_glsl_fragment(&self, key: ProgramKey) -> String {
        use self::names::*;
        use std::fmt::Write;

        let mut code = String::new();
        let _ = writeln!(&mut code, "{}", Self::GLSL_VERSION);
        code.push_str("// !!! START OF GENERATED CODE !!!\n");
        let _ = writeln!(&mut code, "// {} fragment stage", key.token.kind().name());
        code.push_str(self.get_library_code());
        code.push('\n');

        code.push_str("in vec2 v_dftex_uv;\n");
        code.push_str("in vec4 v_dftex_color;\n");
        let _ = writeln!(&mut code, "uniform sampler2D {};", UNIFORM_TEXTURE);
        let _ = writeln!(&mut code, "uniform vec2 {};", UNIFORM_SIZE);
        let _ = writeln!(&mut code, "uniform float {};", UNIFORM_SPREAD);
        let _ = writeln!(&mut code, "out vec4 {};\n", OUTPUT_COLOR);

        code.push_str("void main() {\n");
        let _ = writeln!(
            &mut code,
            "\tfloat value = texture({}, v_dftex_uv).r;",
            UNIFORM_TEXTURE
        );
        if key.has(ProgramKey::UNIFORM_SCALE) {
            let _ = writeln!(
                &mut code,
                "\tfloat width = dftex_uniform_smoothing_width({});",
                UNIFORM_SPREAD
            );
        } else {
            let _ = writeln!(
                &mut code,
                "\tvec2 ddx_texels = dFdx(v_dftex_uv) * {};",
                UNIFORM_SIZE
            );
            let _ = writeln!(
                &mut code,
                "\tvec2 ddy_texels = dFdy(v_dftex_uv) * {};",
                UNIFORM_SIZE
            );
            let _ = writeln!(
                &mut code,
                "\tfloat width = dftex_derivative_smoothing_width({}, ddx_texels, ddy_texels);",
                UNIFORM_SPREAD
            );
        }
        code.push_str("\tfloat coverage = dftex_coverage(value, width);\n");
        let _ = writeln!(
            &mut code,
            "\t{} = dftex_colorize(v_dftex_color, coverage);",
            OUTPUT_COLOR
        );
        code.push_str("}\n");
        code.push_str("// !!! END OF GENERATED CODE !!!\n");
        code
    }
}

impl ProgramBuilder for CodeGen {
    fn build(&self, key: ProgramKey) -> GeneratedProgram {
        match key.token.kind() {
            EffectKind::DistanceFieldTexture => GeneratedProgram {
                key,
                vertex: Self::build_glsl_vertex(key.token.kind()),
                fragment: self.build_glsl_fragment(key),
            },
        }
    }
}
