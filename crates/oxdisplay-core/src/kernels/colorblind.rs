//! Color-deficient vision simulation
//!
//! Brettel, Viénot and Mollon (JOSA 14/10, 1997): project the pixel's LMS
//! response onto one of two half-planes anchored at the equal-energy white
//! and a fixed spectral color, replacing the response of the missing cone.
//! Which half-plane applies is decided by comparing the pixel's ratio along
//! the unaffected axes against the inflection ratio; exact equality may take
//! either branch.

use serde::{Deserialize, Serialize};

/// Which cone response is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Deficiency {
    /// Missing long-wavelength (red) cones
    Protanopia,
    /// Missing medium-wavelength (green) cones
    #[default]
    Deuteranopia,
    /// Missing short-wavelength (blue) cones
    Tritanopia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ColorblindParams {
    #[serde(rename = "type")]
    pub deficiency: Deficiency,
}

impl ColorblindParams {
    pub(crate) fn clamp(&mut self) {}

    pub(crate) fn sanitize(&mut self) {}
}

/// RGB → LMS cone response, row-major
const RGB_TO_LMS: [[f64; 3]; 3] = [
    [0.05059983, 0.08585369, 0.00952420],
    [0.01893033, 0.08925308, 0.01370054],
    [0.00292202, 0.00975732, 0.07145979],
];

/// LMS → RGB, inverse of the above
const LMS_TO_RGB: [[f64; 3]; 3] = [
    [30.830854, -29.832659, 1.610474],
    [-6.481468, 17.715578, -2.532642],
    [-0.375690, -1.199062, 14.273846],
];

/// LMS coordinates of the spectral anchors, in nm order 475, 485, 575, 660
const ANCHOR: [f64; 12] = [
    0.08008, 0.1579, 0.5897, //
    0.1284, 0.2237, 0.3636, //
    0.9856, 0.7325, 0.001079, //
    0.0914, 0.007009, 0.0,
];

#[derive(Debug, Clone, Copy)]
pub(crate) struct ColorblindState {
    deficiency: Deficiency,
    a1: f64,
    b1: f64,
    c1: f64,
    a2: f64,
    b2: f64,
    c2: f64,
    inflection: f64,
}

pub(crate) fn configure(params: &ColorblindParams) -> ColorblindState {
    // Equal-energy white in LMS: row sums of the conversion matrix
    let e = [
        RGB_TO_LMS[0][0] + RGB_TO_LMS[0][1] + RGB_TO_LMS[0][2],
        RGB_TO_LMS[1][0] + RGB_TO_LMS[1][1] + RGB_TO_LMS[1][2],
        RGB_TO_LMS[2][0] + RGB_TO_LMS[2][1] + RGB_TO_LMS[2][2],
    ];

    // Each projection plane passes through the origin, the white point, and
    // one spectral anchor; its normal is the cross product of the latter two.
    match params.deficiency {
        Deficiency::Protanopia | Deficiency::Deuteranopia => ColorblindState {
            deficiency: params.deficiency,
            // 575 nm wing
            a1: e[1] * ANCHOR[8] - e[2] * ANCHOR[7],
            b1: e[2] * ANCHOR[6] - e[0] * ANCHOR[8],
            c1: e[0] * ANCHOR[7] - e[1] * ANCHOR[6],
            // 475 nm wing
            a2: e[1] * ANCHOR[2] - e[2] * ANCHOR[1],
            b2: e[2] * ANCHOR[0] - e[0] * ANCHOR[2],
            c2: e[0] * ANCHOR[1] - e[1] * ANCHOR[0],
            inflection: if params.deficiency == Deficiency::Protanopia {
                e[2] / e[1]
            } else {
                e[2] / e[0]
            },
        },
        Deficiency::Tritanopia => ColorblindState {
            deficiency: params.deficiency,
            // 660 nm wing
            a1: e[1] * ANCHOR[11] - e[2] * ANCHOR[10],
            b1: e[2] * ANCHOR[9] - e[0] * ANCHOR[11],
            c1: e[0] * ANCHOR[10] - e[1] * ANCHOR[9],
            // 485 nm wing
            a2: e[1] * ANCHOR[5] - e[2] * ANCHOR[4],
            b2: e[2] * ANCHOR[3] - e[0] * ANCHOR[5],
            c2: e[0] * ANCHOR[4] - e[1] * ANCHOR[3],
            inflection: e[1] / e[0],
        },
    }
}

#[inline]
fn mul3(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Simulate one RGB pixel; alpha is not part of the model
pub(crate) fn simulate(state: &ColorblindState, rgb: [f32; 3]) -> [f32; 3] {
    let [mut l, mut m, mut s] = mul3(&RGB_TO_LMS, [rgb[0] as f64, rgb[1] as f64, rgb[2] as f64]);

    match state.deficiency {
        Deficiency::Protanopia => {
            let ratio = s / m;
            l = if ratio < state.inflection {
                -(state.b1 * m + state.c1 * s) / state.a1
            } else {
                -(state.b2 * m + state.c2 * s) / state.a2
            };
        }
        Deficiency::Deuteranopia => {
            let ratio = s / l;
            m = if ratio < state.inflection {
                -(state.a1 * l + state.c1 * s) / state.b1
            } else {
                -(state.a2 * l + state.c2 * s) / state.b2
            };
        }
        Deficiency::Tritanopia => {
            let ratio = m / l;
            s = if ratio < state.inflection {
                -(state.a1 * l + state.b1 * m) / state.c1
            } else {
                -(state.a2 * l + state.b2 * m) / state.c2
            };
        }
    }

    let out = mul3(&LMS_TO_RGB, [l, m, s]);
    [
        out[0].clamp(0.0, 1.0) as f32,
        out[1].clamp(0.0, 1.0) as f32,
        out[2].clamp(0.0, 1.0) as f32,
    ]
}
