//! Parametric and profile-driven filter kernels
//!
//! Each kernel module exposes a parameter struct, a derived-state struct,
//! a `configure` function building derived state from parameters, and an
//! apply routine over pixels or rows. `configure` is deterministic and
//! infallible (out-of-range parameters are clamped or defaulted, never
//! rejected); apply never mutates derived state.

pub mod aces;
pub mod clip_warning;
pub mod colorblind;
pub mod contrast;
pub mod gamma;
pub mod icc;
pub mod ink_coverage;
pub mod proof;

use multiversion::multiversion;

/// Derived state for the lookup-table kernels (gamma, contrast)
#[derive(Debug, Clone)]
pub(crate) struct LutState {
    lut: [f32; 256],
}

impl LutState {
    pub(crate) fn from_table(table: [u8; 256]) -> Self {
        let mut lut = [0.0f32; 256];
        for (out, byte) in lut.iter_mut().zip(table) {
            *out = byte as f32 / 255.0;
        }
        Self { lut }
    }

    pub(crate) fn lut(&self) -> &[f32; 256] {
        &self.lut
    }
}

/// Remap the color channels of an interleaved row through a 256-entry LUT,
/// leaving alpha alone. Values are clamped to [0, 1] before lookup.
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub(crate) fn remap_row(row: &mut [f32], channels: usize, lut: &[f32; 256]) {
    for pixel in row.chunks_exact_mut(channels) {
        for value in &mut pixel[..channels - 1] {
            let index = (value.clamp(0.0, 1.0) * 255.0).round() as usize;
            *value = lut[index];
        }
    }
}
