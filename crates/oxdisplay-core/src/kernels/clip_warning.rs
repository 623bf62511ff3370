//! Clip warning display filter
//!
//! Flags pixels outside the displayable range: shadows (any channel below
//! zero), highlights (any channel above one), and bogus values (any
//! non-finite channel, which takes precedence over the other two classes).
//! Flagged pixels are replaced with a blended warning color; along the
//! `(x + y) >> 3` diagonal the inverted variant is used instead, so warnings
//! stay visible over backgrounds matching the warning color. The 8-pixel
//! alternation period is part of the visual contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClipWarningParams {
    pub show_shadows: bool,
    pub shadows_color: [f32; 3],
    pub show_highlights: bool,
    pub highlights_color: [f32; 3],
    pub show_bogus: bool,
    pub bogus_color: [f32; 3],
    /// Also test the alpha channel for shadow/highlight/bogus excursions
    pub include_alpha: bool,
    /// Also warn on fully transparent pixels
    pub include_transparent: bool,
}

impl Default for ClipWarningParams {
    fn default() -> Self {
        Self {
            show_shadows: true,
            shadows_color: [0.25, 0.25, 1.0],
            show_highlights: true,
            highlights_color: [1.0, 0.25, 0.25],
            show_bogus: true,
            bogus_color: [1.0, 1.0, 0.25],
            include_alpha: false,
            include_transparent: false,
        }
    }
}

impl ClipWarningParams {
    pub(crate) fn clamp(&mut self) {
        let defaults = Self::default();
        sanitize_color(&mut self.shadows_color, defaults.shadows_color);
        sanitize_color(&mut self.highlights_color, defaults.highlights_color);
        sanitize_color(&mut self.bogus_color, defaults.bogus_color);
    }

    pub(crate) fn sanitize(&mut self) {
        self.clamp();
    }
}

fn sanitize_color(color: &mut [f32; 3], fallback: [f32; 3]) {
    if color.iter().any(|c| !c.is_finite()) {
        *color = fallback;
    } else {
        for c in color.iter_mut() {
            *c = c.clamp(0.0, 1.0);
        }
    }
}

const SHADOWS_BIT: usize = 1 << 0;
const HIGHLIGHTS_BIT: usize = 1 << 1;
const BOGUS_BIT: usize = 1 << 2;

/// One warning color per class-bit combination, plus the inverted variants
#[derive(Debug, Clone)]
pub(crate) struct ClipWarningState {
    params: ClipWarningParams,
    colors: [[f32; 4]; 8],
    alt_colors: [[f32; 4]; 8],
}

pub(crate) fn configure(params: &ClipWarningParams) -> ClipWarningState {
    let mut colors = [[0.0f32; 4]; 8];
    let mut alt_colors = [[0.0f32; 4]; 8];

    for combination in 1..8 {
        let mut blend = [0.0f32; 3];
        let mut members = 0.0f32;
        for (bit, color) in [
            (SHADOWS_BIT, params.shadows_color),
            (HIGHLIGHTS_BIT, params.highlights_color),
            (BOGUS_BIT, params.bogus_color),
        ] {
            if combination & bit != 0 {
                for (acc, c) in blend.iter_mut().zip(color) {
                    *acc += c;
                }
                members += 1.0;
            }
        }
        for c in blend.iter_mut() {
            *c /= members;
        }
        colors[combination] = [blend[0], blend[1], blend[2], 1.0];
        alt_colors[combination] = [1.0 - blend[0], 1.0 - blend[1], 1.0 - blend[2], 1.0];
    }

    ClipWarningState {
        params: *params,
        colors,
        alt_colors,
    }
}

/// Classify and, when flagged, replace one pixel at absolute position (x, y)
pub(crate) fn mark_pixel(state: &ClipWarningState, pixel: &mut [f32], x: u32, y: u32) {
    let params = &state.params;
    let alpha_index = pixel.len() - 1;
    let alpha = pixel[alpha_index];

    if !params.include_transparent && !(alpha > 0.0) {
        return;
    }

    let color = &pixel[..alpha_index];
    let bogus = color.iter().any(|v| !v.is_finite())
        || (params.include_alpha && !alpha.is_finite());

    let mut combination = 0usize;
    if bogus {
        if params.show_bogus {
            combination = BOGUS_BIT;
        }
    } else {
        if params.show_shadows
            && (color.iter().any(|v| *v < 0.0) || (params.include_alpha && alpha < 0.0))
        {
            combination |= SHADOWS_BIT;
        }
        if params.show_highlights
            && (color.iter().any(|v| *v > 1.0) || (params.include_alpha && alpha > 1.0))
        {
            combination |= HIGHLIGHTS_BIT;
        }
    }

    if combination != 0 {
        let alternate = (x.wrapping_add(y) >> 3) & 1 == 1;
        let replacement = if alternate {
            state.alt_colors[combination]
        } else {
            state.colors[combination]
        };
        pixel.copy_from_slice(&replacement[..pixel.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_state() -> ClipWarningState {
        configure(&ClipWarningParams::default())
    }

    #[test]
    fn test_in_range_pixel_untouched() {
        let state = default_state();
        for (x, y) in [(0, 0), (7, 0), (8, 0), (123, 456)] {
            let mut pixel = [0.2f32, 0.5, 0.9, 1.0];
            mark_pixel(&state, &mut pixel, x, y);
            assert_eq!(pixel, [0.2, 0.5, 0.9, 1.0], "flagged at ({x}, {y})");
        }
    }

    #[test]
    fn test_shadow_and_highlight_classes() {
        let state = default_state();

        let mut shadow = [-0.1f32, 0.5, 0.5, 1.0];
        mark_pixel(&state, &mut shadow, 0, 0);
        assert_eq!(shadow, [0.25, 0.25, 1.0, 1.0]);

        let mut highlight = [0.5f32, 1.5, 0.5, 1.0];
        mark_pixel(&state, &mut highlight, 0, 0);
        assert_eq!(highlight, [1.0, 0.25, 0.25, 1.0]);

        // Both at once blends the two warning colors
        let mut both = [-0.1f32, 1.5, 0.5, 1.0];
        mark_pixel(&state, &mut both, 0, 0);
        assert_eq!(both, [0.625, 0.25, 0.625, 1.0]);
    }

    #[test]
    fn test_bogus_takes_precedence() {
        let state = default_state();
        let mut pixel = [f32::NAN, -1.0, 2.0, 1.0];
        mark_pixel(&state, &mut pixel, 0, 0);
        assert_eq!(pixel, [1.0, 1.0, 0.25, 1.0]);
    }

    #[test]
    fn test_alternation_period_is_eight_pixels() {
        let state = default_state();

        let mut base = [2.0f32, 0.0, 0.0, 1.0];
        mark_pixel(&state, &mut base, 0, 0);

        // Same classification 8 pixels along the diagonal flips the variant
        let mut shifted = [2.0f32, 0.0, 0.0, 1.0];
        mark_pixel(&state, &mut shifted, 8, 0);
        assert_ne!(base, shifted);
        assert_eq!(shifted, [0.0, 0.75, 0.75, 1.0]);

        // And 16 pixels along flips it back
        let mut wrapped = [2.0f32, 0.0, 0.0, 1.0];
        mark_pixel(&state, &mut wrapped, 8, 8);
        assert_eq!(base, wrapped);
    }

    #[test]
    fn test_transparent_pixels_skipped_by_default() {
        let state = default_state();
        let mut pixel = [5.0f32, 5.0, 5.0, 0.0];
        mark_pixel(&state, &mut pixel, 0, 0);
        assert_eq!(pixel, [5.0, 5.0, 5.0, 0.0]);

        let mut params = ClipWarningParams::default();
        params.include_transparent = true;
        let state = configure(&params);
        let mut pixel = [5.0f32, 5.0, 5.0, 0.0];
        mark_pixel(&state, &mut pixel, 0, 0);
        assert_eq!(pixel, [1.0, 0.25, 0.25, 1.0]);
    }

    #[test]
    fn test_disabled_classes_do_not_fire() {
        let mut params = ClipWarningParams::default();
        params.show_highlights = false;
        let state = configure(&params);
        let mut pixel = [1.5f32, 0.5, 0.5, 1.0];
        mark_pixel(&state, &mut pixel, 0, 0);
        assert_eq!(pixel, [1.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_alpha_excursions_need_opt_in() {
        let state = default_state();
        let mut pixel = [0.5f32, 0.5, 0.5, 1.5];
        mark_pixel(&state, &mut pixel, 0, 0);
        assert_eq!(pixel, [0.5, 0.5, 0.5, 1.5]);

        let mut params = ClipWarningParams::default();
        params.include_alpha = true;
        let state = configure(&params);
        let mut pixel = [0.5f32, 0.5, 0.5, 1.5];
        mark_pixel(&state, &mut pixel, 0, 0);
        assert_eq!(pixel, [1.0, 0.25, 0.25, 1.0]);
    }
}
