#![allow(clippy::print_stdout, clippy::print_stderr, clippy::dbg_macro)] // ok to use in tests, benches & build scripts

use dftex::render::RenderOptions;
use dftex::render::RenderTarget;
use glam::Affine2;
use glam::Vec2;
use glam::Vec4;
use tiny_bench::BenchmarkConfig;

pub fn main() {
    let center = Vec2::splat(128.0);
    let field = dftex::DistanceField::from_sdf(
        [256, 256],
        dftex::FieldEncoding { spread: 8.0 },
        dftex::TexelFormat::A8,
        |pos| dftex::sd_ring(pos, center, 96.0, 24.0),
    )
    .unwrap();
    let texture = dftex::TextureHandle::new(field);
    let access = dftex::TextureAccessConfig::default();

    let target = RenderTarget {
        width: 512,
        height: 512,
    };
    // rotated and minified, so the derivative path does real work
    let uv_from_pixel = Affine2::from_scale_angle_translation(
        Vec2::splat(1.5 / 512.0),
        0.3,
        Vec2::new(-0.2, -0.1),
    );

    let bench_cfg = BenchmarkConfig {
        num_samples: 10,
        ..Default::default()
    };
    for uniform_scale in [true, false] {
        let effect = dftex::EffectInstance::create(Some(&texture), access, uniform_scale).unwrap();
        let label = if uniform_scale {
            "render_uniform_scale"
        } else {
            "render_derivative_scale"
        };
        tiny_bench::bench_with_configuration_labeled(label, &bench_cfg, || {
            dftex::render::render(
                &effect,
                target,
                uv_from_pixel,
                Vec4::ONE,
                &RenderOptions::default(),
            )
        });
        eprintln!("{}: {} fragments shaded", label, effect.fragments_shaded());
    }
}
