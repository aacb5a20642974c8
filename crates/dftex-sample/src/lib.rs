//! Per-fragment distance field texture math: wrap resolution, smoothing,
//! coverage and colorization.
//!
//! Everything here is a pure function of its inputs so the same code can run
//! on the host and on `spirv` targets.

#![cfg_attr(target_arch = "spirv", feature(repr_simd, core_intrinsics))]
#![cfg_attr(target_arch = "spirv", no_std)]

mod access;
pub use access::*;

mod smooth;
pub use smooth::*;

mod color;
pub use color::*;

mod shapes;
pub use shapes::*;

#[cfg(not(target_arch = "spirv"))]
pub fn get_glsl_library_code() -> &'static str {
    include_str!("sample.glsl")
}
