//! Profile-to-profile color transforms
//!
//! Wraps the engine's f32 transform executors. A transform is a pure
//! function once built; configuration changes invalidate it and the owning
//! filter rebuilds on next use. Building with a missing profile never
//! happens here — filters resolve profiles first and skip the build (staying
//! in copy-through mode) when one is absent.

use serde::{Deserialize, Serialize};

use crate::profile::ColorProfile;
use crate::{Error, Result};
use moxcms::TransformExecutor;

/// Rendering intent for color transformations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderingIntent {
    /// Perceptual rendering intent - best for photographic images
    #[default]
    Perceptual,
    /// Relative colorimetric - preserves in-gamut colors, clips out-of-gamut
    RelativeColorimetric,
    /// Saturation - maintains saturation, may shift hue
    Saturation,
    /// Absolute colorimetric - preserves white point
    AbsoluteColorimetric,
}

impl From<RenderingIntent> for moxcms::RenderingIntent {
    fn from(intent: RenderingIntent) -> Self {
        match intent {
            RenderingIntent::Perceptual => moxcms::RenderingIntent::Perceptual,
            RenderingIntent::RelativeColorimetric => moxcms::RenderingIntent::RelativeColorimetric,
            RenderingIntent::Saturation => moxcms::RenderingIntent::Saturation,
            RenderingIntent::AbsoluteColorimetric => moxcms::RenderingIntent::AbsoluteColorimetric,
        }
    }
}

/// Pixel layout on one side of a transform
///
/// The engine has no dedicated CMYK layout: 4-channel ink data travels as
/// `Rgba`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 3 channels
    Rgb,
    /// 4 channels (RGBA, or CMYK for ink profiles)
    Rgba,
    /// 1 channel
    Gray,
    /// 2 channels
    GrayAlpha,
}

impl Layout {
    /// Get number of channels for this layout
    pub fn channels(&self) -> usize {
        match self {
            Layout::Rgb => 3,
            Layout::Rgba => 4,
            Layout::Gray => 1,
            Layout::GrayAlpha => 2,
        }
    }

    /// Layout carrying a profile's device channels, alpha excluded
    pub fn for_profile(profile: &ColorProfile) -> Layout {
        match profile.color_space().channels() {
            1 => Layout::Gray,
            4 => Layout::Rgba,
            _ => Layout::Rgb,
        }
    }
}

impl From<Layout> for moxcms::Layout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Rgb => moxcms::Layout::Rgb,
            Layout::Rgba => moxcms::Layout::Rgba,
            Layout::Gray => moxcms::Layout::Gray,
            Layout::GrayAlpha => moxcms::Layout::GrayAlpha,
        }
    }
}

/// Options for transform creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransformOptions {
    /// Rendering intent
    pub intent: RenderingIntent,
    /// Black point compensation (advisory; carried in persisted state)
    pub black_point_compensation: bool,
}

impl From<TransformOptions> for moxcms::TransformOptions {
    fn from(opts: TransformOptions) -> Self {
        moxcms::TransformOptions {
            rendering_intent: opts.intent.into(),
            ..Default::default()
        }
    }
}

/// A built f32 transform between two profiles
pub struct Transform {
    inner: std::sync::Arc<moxcms::TransformF32Executor>,
    src_channels: usize,
    dst_channels: usize,
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("src_channels", &self.src_channels)
            .field("dst_channels", &self.dst_channels)
            .finish()
    }
}

impl Transform {
    /// Build a transform between two profiles with explicit layouts
    pub fn new(
        src_profile: &ColorProfile,
        src_layout: Layout,
        dst_profile: &ColorProfile,
        dst_layout: Layout,
        options: TransformOptions,
    ) -> Result<Self> {
        let inner = src_profile
            .inner()
            .create_transform_f32(
                src_layout.into(),
                dst_profile.inner(),
                dst_layout.into(),
                options.into(),
            )
            .map_err(|e| Error::Transform(format!("{:?}", e)))?;

        tracing::debug!(
            src = ?src_layout,
            dst = ?dst_layout,
            intent = ?options.intent,
            "built color transform"
        );

        Ok(Self {
            inner,
            src_channels: src_layout.channels(),
            dst_channels: dst_layout.channels(),
        })
    }

    /// Build a 4-channel RGBA → RGBA display transform, alpha passed through
    pub fn display(
        src_profile: &ColorProfile,
        dst_profile: &ColorProfile,
        options: TransformOptions,
    ) -> Result<Self> {
        Self::new(src_profile, Layout::Rgba, dst_profile, Layout::Rgba, options)
    }

    pub fn src_channels(&self) -> usize {
        self.src_channels
    }

    pub fn dst_channels(&self) -> usize {
        self.dst_channels
    }

    /// Transform interleaved f32 pixel data
    ///
    /// `src` and `dst` must describe the same pixel count in the source and
    /// destination layouts respectively.
    pub fn transform(&self, src: &[f32], dst: &mut [f32]) -> Result<()> {
        self.inner
            .transform(src, dst)
            .map_err(|e| Error::Transform(format!("{:?}", e)))
    }

    /// Transform a row in place (src and dst layouts must have equal width)
    pub fn transform_in_place(&self, row: &mut [f32], scratch: &mut Vec<f32>) -> Result<()> {
        scratch.clear();
        scratch.extend_from_slice(row);
        self.transform(scratch, row)
    }
}

/// A two-stage soft-proof transform: image space → proof space → display
///
/// The proof leg simulates output on the proofing device (its own intent),
/// the display leg renders that simulation for the monitor. With gamut
/// checking on, proof values are also converted back to the image space; a
/// pixel whose round trip moves any channel by more than `threshold` is out
/// of the proof gamut and gets the alarm color instead.
pub struct ProofTransform {
    to_proof: Transform,
    to_display: Transform,
    from_proof: Option<Transform>,
    proof_channels: usize,
    alarm: [f32; 3],
    threshold: f32,
}

impl ProofTransform {
    pub fn new(
        image_profile: &ColorProfile,
        proof_profile: &ColorProfile,
        display_profile: &ColorProfile,
        simulation_intent: RenderingIntent,
        display_intent: RenderingIntent,
        gamut_check: Option<(f32, [f32; 3])>,
    ) -> Result<Self> {
        let proof_layout = Layout::for_profile(proof_profile);

        let to_proof = Transform::new(
            image_profile,
            Layout::Rgb,
            proof_profile,
            proof_layout,
            TransformOptions {
                intent: simulation_intent,
                black_point_compensation: false,
            },
        )?;
        let to_display = Transform::new(
            proof_profile,
            proof_layout,
            display_profile,
            Layout::Rgb,
            TransformOptions {
                intent: display_intent,
                black_point_compensation: false,
            },
        )?;

        let (threshold, alarm, from_proof) = match gamut_check {
            Some((threshold, alarm)) => {
                let back = Transform::new(
                    proof_profile,
                    proof_layout,
                    image_profile,
                    Layout::Rgb,
                    TransformOptions {
                        intent: RenderingIntent::RelativeColorimetric,
                        black_point_compensation: false,
                    },
                )?;
                (threshold, alarm, Some(back))
            }
            None => (0.0, [0.0; 3], None),
        };

        Ok(Self {
            to_proof,
            to_display,
            from_proof,
            proof_channels: proof_layout.channels(),
            alarm,
            threshold,
        })
    }

    /// Soft-proof a packed RGB row (3 channels per pixel) in place
    pub fn apply_rgb_row(&self, rgb: &mut [f32]) -> Result<()> {
        let pixels = rgb.len() / 3;
        let mut proof_vals = vec![0.0f32; pixels * self.proof_channels];
        self.to_proof.transform(rgb, &mut proof_vals)?;

        let mut out_of_gamut = Vec::new();
        if let Some(back) = &self.from_proof {
            let mut round_trip = vec![0.0f32; pixels * 3];
            back.transform(&proof_vals, &mut round_trip)?;
            for i in 0..pixels {
                let original = &rgb[i * 3..i * 3 + 3];
                let returned = &round_trip[i * 3..i * 3 + 3];
                let escaped = original
                    .iter()
                    .zip(returned)
                    .any(|(a, b)| (a - b).abs() > self.threshold);
                if escaped {
                    out_of_gamut.push(i);
                }
            }
        }

        self.to_display.transform(&proof_vals, rgb)?;

        for i in out_of_gamut {
            rgb[i * 3..i * 3 + 3].copy_from_slice(&self.alarm);
        }
        Ok(())
    }
}
