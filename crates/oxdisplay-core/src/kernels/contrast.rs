//! High-contrast display filter
//!
//! A periodic sine remap that exaggerates small value differences, useful
//! for inspecting near-flat regions. Not monotonic by design.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::LutState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContrastParams {
    pub contrast: f64,
}

impl Default for ContrastParams {
    fn default() -> Self {
        Self { contrast: 1.0 }
    }
}

impl ContrastParams {
    /// Non-positive or non-finite contrast behaves as 1.0, like gamma
    pub(crate) fn clamp(&mut self) {
        if !(self.contrast > 0.0) || !self.contrast.is_finite() {
            self.contrast = 1.0;
        }
    }

    pub(crate) fn sanitize(&mut self) {
        self.clamp();
    }
}

/// Build the contrast lookup table:
/// `table[i] = round(255 · 0.5 · (1 + sin(contrast · 2π · i / 255)))`
pub fn contrast_table(contrast: f64) -> [u8; 256] {
    let contrast = if !(contrast > 0.0) || !contrast.is_finite() {
        1.0
    } else {
        contrast
    };
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let phase = contrast * 2.0 * PI * i as f64 / 255.0;
        let value = 255.0 * 0.5 * (1.0 + phase.sin());
        *entry = value.round() as u8;
    }
    table
}

pub(crate) fn configure(params: &ContrastParams) -> LutState {
    LutState::from_table(contrast_table(params.contrast))
}
