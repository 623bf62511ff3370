//! Soft-proofing filter
//!
//! Simulates output on a proofing device (usually a printer profile) while
//! rendering for the monitor. The simulation and display legs carry
//! independent rendering intents; an optional gamut check paints pixels the
//! proof space cannot represent with an alarm color.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::profile::ColorProfile;
use crate::transform::{ProofTransform, RenderingIntent};

pub const GAMUT_THRESHOLD_DEFAULT: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProofParams {
    /// Proofing device profile; without it the filter is identity
    pub profile: Option<PathBuf>,
    /// Image → proof intent
    pub simulation_intent: RenderingIntent,
    /// Proof → monitor intent
    pub display_intent: RenderingIntent,
    pub gamut_check: bool,
    pub alarm_color: [f32; 3],
    /// Per-channel round-trip delta above which a pixel counts as
    /// out of gamut
    pub gamut_threshold: f64,
}

impl Default for ProofParams {
    fn default() -> Self {
        Self {
            profile: None,
            simulation_intent: RenderingIntent::Perceptual,
            display_intent: RenderingIntent::RelativeColorimetric,
            gamut_check: false,
            alarm_color: [0.5, 0.5, 0.5],
            gamut_threshold: GAMUT_THRESHOLD_DEFAULT,
        }
    }
}

impl ProofParams {
    pub(crate) fn clamp(&mut self) {
        if !self.gamut_threshold.is_finite() {
            self.gamut_threshold = GAMUT_THRESHOLD_DEFAULT;
        } else {
            self.gamut_threshold = self.gamut_threshold.clamp(0.0, 1.0);
        }
        if self.alarm_color.iter().any(|c| !c.is_finite()) {
            self.alarm_color = Self::default().alarm_color;
        }
    }

    pub(crate) fn sanitize(&mut self) {
        if !self.gamut_threshold.is_finite()
            || self.gamut_threshold < 0.0
            || self.gamut_threshold > 1.0
        {
            self.gamut_threshold = GAMUT_THRESHOLD_DEFAULT;
        }
        if self.alarm_color.iter().any(|c| !c.is_finite()) {
            self.alarm_color = Self::default().alarm_color;
        }
    }
}

pub(crate) struct ProofState {
    proof: Option<ProofTransform>,
}

impl ProofState {
    pub(crate) fn proof(&self) -> Option<&ProofTransform> {
        self.proof.as_ref()
    }
}

pub(crate) fn configure(params: &ProofParams) -> ProofState {
    let Some(path) = &params.profile else {
        return ProofState { proof: None };
    };
    let Some(proof_profile) = ColorProfile::open_path(path) else {
        tracing::warn!(
            "proof profile {} unusable, soft proof is identity",
            path.display()
        );
        return ProofState { proof: None };
    };

    let srgb = ColorProfile::new_srgb();
    let gamut = params
        .gamut_check
        .then_some((params.gamut_threshold as f32, params.alarm_color));

    let proof = ProofTransform::new(
        &srgb,
        &proof_profile,
        &srgb,
        params.simulation_intent,
        params.display_intent,
        gamut,
    )
    .inspect_err(|e| tracing::warn!("proof transform failed: {e}"))
    .ok();

    ProofState { proof }
}
