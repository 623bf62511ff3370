//! Gamma display filter
//!
//! Remaps color channels through `v ↦ v^(1/gamma)`, quantized through a
//! 256-entry table so the screen response matches the historical 8-bit
//! behavior exactly.

use serde::{Deserialize, Serialize};

use super::LutState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GammaParams {
    pub gamma: f64,
}

impl Default for GammaParams {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

impl GammaParams {
    /// Non-positive or non-finite gamma behaves as 1.0
    pub(crate) fn clamp(&mut self) {
        if !(self.gamma > 0.0) || !self.gamma.is_finite() {
            self.gamma = 1.0;
        }
    }

    pub(crate) fn sanitize(&mut self) {
        self.clamp();
    }
}

/// Build the gamma lookup table: `table[i] = round(255 · (i/255)^(1/gamma))`
pub fn gamma_table(gamma: f64) -> [u8; 256] {
    let gamma = if !(gamma > 0.0) || !gamma.is_finite() {
        1.0
    } else {
        gamma
    };
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let value = 255.0 * (i as f64 / 255.0).powf(1.0 / gamma);
        *entry = value.round() as u8;
    }
    table
}

pub(crate) fn configure(params: &GammaParams) -> LutState {
    LutState::from_table(gamma_table(params.gamma))
}
