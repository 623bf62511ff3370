//! Filmic tone mapping (ACES RRT rational fit)
//!
//! Applies an exposure gain followed by the rational approximation of the
//! ACES reference rendering transform, per color channel. Output is not
//! clamped; a clip-warning filter further down the chain can visualize any
//! residual excursion.

use multiversion::multiversion;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AcesParams {
    /// Exposure in stops; the gain applied before the curve is 2^exposure
    pub exposure: f64,
}

impl Default for AcesParams {
    fn default() -> Self {
        Self { exposure: 0.0 }
    }
}

impl AcesParams {
    pub(crate) fn clamp(&mut self) {
        if !self.exposure.is_finite() {
            self.exposure = 0.0;
        }
    }

    pub(crate) fn sanitize(&mut self) {
        self.clamp();
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct AcesState {
    gain: f32,
}

pub(crate) fn configure(params: &AcesParams) -> AcesState {
    AcesState {
        gain: params.exposure.exp2() as f32,
    }
}

/// The ACES RRT rational fit
#[inline]
pub fn aces_rrt(x: f32) -> f32 {
    (x * (x + 0.0245786) - 0.0000905) / (x * (0.983729 * x + 0.432951) + 0.238081)
}

/// Tone-map the color channels of an interleaved row, alpha untouched
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub(crate) fn tone_map_row(row: &mut [f32], channels: usize, state: &AcesState) {
    for pixel in row.chunks_exact_mut(channels) {
        for value in &mut pixel[..channels - 1] {
            *value = aces_rrt(*value * state.gain);
        }
    }
}
