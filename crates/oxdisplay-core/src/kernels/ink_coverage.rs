//! Total ink coverage warning
//!
//! For print preparation: the sum of the C, M, Y and K inks, expressed in
//! percent (0–400), must stay under the press's total area coverage limit.
//! Pixels over the limit with non-zero alpha are replaced by the warning
//! color. CMYKA buffers are checked natively; RGBA buffers are converted
//! read-side through a CMYK profile and written back unchanged in RGBA.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::profile::ColorProfile;
use crate::transform::{Layout, Transform, TransformOptions};

pub const INK_LIMIT_MIN: f64 = 0.0;
pub const INK_LIMIT_MAX: f64 = 400.0;
pub const INK_LIMIT_DEFAULT: f64 = 240.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InkCoverageParams {
    /// Total area coverage limit in percent
    #[serde(rename = "ink-limit")]
    pub limit: f64,
    pub warning_color: [f32; 3],
    /// CMYK profile used to analyze RGBA buffers; without it, RGBA buffers
    /// pass through unchanged
    pub profile: Option<PathBuf>,
}

impl Default for InkCoverageParams {
    fn default() -> Self {
        Self {
            limit: INK_LIMIT_DEFAULT,
            warning_color: [0.5, 0.5, 0.5],
            profile: None,
        }
    }
}

impl InkCoverageParams {
    /// Edits clamp to the valid range
    pub(crate) fn clamp(&mut self) {
        if self.limit.is_finite() {
            self.limit = self.limit.clamp(INK_LIMIT_MIN, INK_LIMIT_MAX);
        } else {
            self.limit = INK_LIMIT_DEFAULT;
        }
        if self.warning_color.iter().any(|c| !c.is_finite()) {
            self.warning_color = Self::default().warning_color;
        }
    }

    /// Loaded values outside the range reset to the default instead
    pub(crate) fn sanitize(&mut self) {
        if !self.limit.is_finite() || self.limit < INK_LIMIT_MIN || self.limit > INK_LIMIT_MAX {
            self.limit = INK_LIMIT_DEFAULT;
        }
        if self.warning_color.iter().any(|c| !c.is_finite()) {
            self.warning_color = Self::default().warning_color;
        }
    }
}

pub(crate) struct InkCoverageState {
    /// RGB → CMYK analysis transform, absent when no usable profile is set
    to_cmyk: Option<Transform>,
    /// Warning color expressed in the working CMYK space
    warning_cmyka: [f32; 5],
    warning_rgba: [f32; 4],
    /// Limit as a channel-sum threshold (percent / 100)
    threshold: f32,
}

impl InkCoverageState {
    pub(crate) fn has_rgb_analysis(&self) -> bool {
        self.to_cmyk.is_some()
    }
}

/// Profile-less fallback conversion, also the native space of CMYKA buffers
fn naive_rgb_to_cmyk(rgb: [f32; 3]) -> [f32; 4] {
    let max = rgb[0].max(rgb[1]).max(rgb[2]).clamp(0.0, 1.0);
    let k = 1.0 - max;
    if max <= 0.0 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    [
        ((1.0 - rgb[0].clamp(0.0, 1.0) - k) / max).clamp(0.0, 1.0),
        ((1.0 - rgb[1].clamp(0.0, 1.0) - k) / max).clamp(0.0, 1.0),
        ((1.0 - rgb[2].clamp(0.0, 1.0) - k) / max).clamp(0.0, 1.0),
        k,
    ]
}

pub(crate) fn configure(params: &InkCoverageParams) -> InkCoverageState {
    let to_cmyk = params
        .profile
        .as_deref()
        .and_then(ColorProfile::open_path)
        .and_then(|profile| {
            if !profile.is_cmyk() {
                tracing::warn!("ink coverage profile is not CMYK, ignoring");
                return None;
            }
            Transform::new(
                &ColorProfile::new_srgb(),
                Layout::Rgb,
                &profile,
                Layout::Rgba,
                TransformOptions::default(),
            )
            .inspect_err(|e| tracing::warn!("ink coverage transform failed: {e}"))
            .ok()
        });

    let warning_cmyk = match &to_cmyk {
        Some(transform) => {
            let mut cmyk = [0.0f32; 4];
            match transform.transform(&params.warning_color, &mut cmyk) {
                Ok(()) => cmyk,
                Err(_) => naive_rgb_to_cmyk(params.warning_color),
            }
        }
        None => naive_rgb_to_cmyk(params.warning_color),
    };

    let [c, m, y, k] = warning_cmyk;
    let [r, g, b] = params.warning_color;
    InkCoverageState {
        to_cmyk,
        warning_cmyka: [c, m, y, k, 1.0],
        warning_rgba: [r, g, b, 1.0],
        threshold: (params.limit / 100.0) as f32,
    }
}

/// Check one native CMYKA pixel
pub(crate) fn mark_cmyka_pixel(state: &InkCoverageState, pixel: &mut [f32]) {
    let coverage = pixel[0] + pixel[1] + pixel[2] + pixel[3];
    if coverage > state.threshold && pixel[4] > 0.0 {
        pixel.copy_from_slice(&state.warning_cmyka);
    }
}

/// Check an RGBA row by converting it read-side to CMYK
///
/// The row itself is only written where the limit is exceeded; the
/// conversion output is discarded.
pub(crate) fn mark_rgba_row(state: &InkCoverageState, row: &mut [f32]) {
    let Some(transform) = &state.to_cmyk else {
        return;
    };
    let pixels = row.len() / 4;
    let mut rgb = Vec::with_capacity(pixels * 3);
    for pixel in row.chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
    }
    let mut cmyk = vec![0.0f32; pixels * 4];
    if transform.transform(&rgb, &mut cmyk).is_err() {
        return;
    }
    for (pixel, inks) in row.chunks_exact_mut(4).zip(cmyk.chunks_exact(4)) {
        let coverage: f32 = inks.iter().sum();
        if coverage > state.threshold && pixel[3] > 0.0 {
            pixel.copy_from_slice(&state.warning_rgba);
        }
    }
}
