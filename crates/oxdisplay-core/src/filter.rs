//! Filter instances
//!
//! A filter couples one kernel with its mutable configuration and lazily
//! maintained derived state. Parameter writes mark the instance dirty and
//! notify listeners synchronously but never recompute; derived state is
//! rebuilt at most once per burst of edits, on the next `apply`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kernels::{
    self, aces, clip_warning, colorblind, contrast, gamma, icc, ink_coverage, proof,
};
use crate::notify::{ChangeListeners, FilterId, ListenerId};
use crate::region::{PixelFormat, PixelRegion, for_each_row, rgba_pixels_mut};
use crate::transform::RenderingIntent;
use crate::{Error, Result};

/// The closed set of filter kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Gamma,
    Contrast,
    Colorblind,
    Aces,
    ClipWarning,
    InkCoverage,
    Icc,
    Proof,
}

/// Static identity of a kernel: display name, help id, parameter defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDescriptor {
    pub kind: FilterKind,
    pub name: &'static str,
    pub help_id: &'static str,
}

impl FilterKind {
    pub const ALL: [FilterKind; 8] = [
        FilterKind::Gamma,
        FilterKind::Contrast,
        FilterKind::Colorblind,
        FilterKind::Aces,
        FilterKind::ClipWarning,
        FilterKind::InkCoverage,
        FilterKind::Icc,
        FilterKind::Proof,
    ];

    pub fn descriptor(self) -> &'static FilterDescriptor {
        match self {
            FilterKind::Gamma => &FilterDescriptor {
                kind: FilterKind::Gamma,
                name: "Gamma",
                help_id: "display-filter-gamma",
            },
            FilterKind::Contrast => &FilterDescriptor {
                kind: FilterKind::Contrast,
                name: "Contrast",
                help_id: "display-filter-contrast",
            },
            FilterKind::Colorblind => &FilterDescriptor {
                kind: FilterKind::Colorblind,
                name: "Color Deficient Vision",
                help_id: "display-filter-colorblind",
            },
            FilterKind::Aces => &FilterDescriptor {
                kind: FilterKind::Aces,
                name: "Filmic (ACES RRT)",
                help_id: "display-filter-aces",
            },
            FilterKind::ClipWarning => &FilterDescriptor {
                kind: FilterKind::ClipWarning,
                name: "Clip Warning",
                help_id: "display-filter-clip-warning",
            },
            FilterKind::InkCoverage => &FilterDescriptor {
                kind: FilterKind::InkCoverage,
                name: "Total Ink Coverage",
                help_id: "display-filter-ink-coverage",
            },
            FilterKind::Icc => &FilterDescriptor {
                kind: FilterKind::Icc,
                name: "Color Management",
                help_id: "display-filter-icc",
            },
            FilterKind::Proof => &FilterDescriptor {
                kind: FilterKind::Proof,
                name: "Color Proof",
                help_id: "display-filter-proof",
            },
        }
    }

    pub fn default_params(self) -> FilterParams {
        match self {
            FilterKind::Gamma => FilterParams::Gamma(gamma::GammaParams::default()),
            FilterKind::Contrast => FilterParams::Contrast(contrast::ContrastParams::default()),
            FilterKind::Colorblind => {
                FilterParams::Colorblind(colorblind::ColorblindParams::default())
            }
            FilterKind::Aces => FilterParams::Aces(aces::AcesParams::default()),
            FilterKind::ClipWarning => {
                FilterParams::ClipWarning(clip_warning::ClipWarningParams::default())
            }
            FilterKind::InkCoverage => {
                FilterParams::InkCoverage(ink_coverage::InkCoverageParams::default())
            }
            FilterKind::Icc => FilterParams::Icc(icc::IccParams::default()),
            FilterKind::Proof => FilterParams::Proof(proof::ProofParams::default()),
        }
    }
}

/// Parameter set of a filter instance, tagged by kernel
///
/// Serializes to a flat kebab-case key-value object with a `filter` tag;
/// only parameters are ever persisted, never derived state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "kebab-case")]
pub enum FilterParams {
    Gamma(gamma::GammaParams),
    Contrast(contrast::ContrastParams),
    Colorblind(colorblind::ColorblindParams),
    Aces(aces::AcesParams),
    ClipWarning(clip_warning::ClipWarningParams),
    InkCoverage(ink_coverage::InkCoverageParams),
    Icc(icc::IccParams),
    Proof(proof::ProofParams),
}

impl FilterParams {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterParams::Gamma(_) => FilterKind::Gamma,
            FilterParams::Contrast(_) => FilterKind::Contrast,
            FilterParams::Colorblind(_) => FilterKind::Colorblind,
            FilterParams::Aces(_) => FilterKind::Aces,
            FilterParams::ClipWarning(_) => FilterKind::ClipWarning,
            FilterParams::InkCoverage(_) => FilterKind::InkCoverage,
            FilterParams::Icc(_) => FilterKind::Icc,
            FilterParams::Proof(_) => FilterKind::Proof,
        }
    }

    /// Clamp edited values into their documented ranges
    pub(crate) fn clamp(&mut self) {
        match self {
            FilterParams::Gamma(p) => p.clamp(),
            FilterParams::Contrast(p) => p.clamp(),
            FilterParams::Colorblind(p) => p.clamp(),
            FilterParams::Aces(p) => p.clamp(),
            FilterParams::ClipWarning(p) => p.clamp(),
            FilterParams::InkCoverage(p) => p.clamp(),
            FilterParams::Icc(p) => p.clamp(),
            FilterParams::Proof(p) => p.clamp(),
        }
    }

    /// Reset loaded out-of-range fields to their kernel defaults
    pub(crate) fn sanitize(&mut self) {
        match self {
            FilterParams::Gamma(p) => p.sanitize(),
            FilterParams::Contrast(p) => p.sanitize(),
            FilterParams::Colorblind(p) => p.sanitize(),
            FilterParams::Aces(p) => p.sanitize(),
            FilterParams::ClipWarning(p) => p.sanitize(),
            FilterParams::InkCoverage(p) => p.sanitize(),
            FilterParams::Icc(p) => p.sanitize(),
            FilterParams::Proof(p) => p.sanitize(),
        }
    }
}

/// Addressable parameter fields across all kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamField {
    Gamma,
    Contrast,
    Deficiency,
    Exposure,
    ShowShadows,
    ShadowsColor,
    ShowHighlights,
    HighlightsColor,
    ShowBogus,
    BogusColor,
    IncludeAlpha,
    IncludeTransparent,
    InkLimit,
    WarningColor,
    Profile,
    SrcProfile,
    DestProfile,
    Intent,
    BlackPointCompensation,
    SimulationIntent,
    DisplayIntent,
    GamutCheck,
    AlarmColor,
    GamutThreshold,
}

/// Typed values accepted by [`Filter::set_param`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Float(f64),
    Color([f32; 3]),
    Path(Option<PathBuf>),
    Intent(RenderingIntent),
    Deficiency(colorblind::Deficiency),
}

impl FilterParams {
    /// The explicit field dispatch: one arm per (kernel, field) pair.
    /// Returns false when the field or value type does not fit the kernel.
    fn apply_field(&mut self, field: ParamField, value: ParamValue) -> bool {
        use FilterParams as P;
        use ParamField as F;
        use ParamValue as V;

        match (self, field, value) {
            (P::Gamma(p), F::Gamma, V::Float(v)) => p.gamma = v,
            (P::Contrast(p), F::Contrast, V::Float(v)) => p.contrast = v,
            (P::Colorblind(p), F::Deficiency, V::Deficiency(v)) => p.deficiency = v,
            (P::Aces(p), F::Exposure, V::Float(v)) => p.exposure = v,
            (P::ClipWarning(p), F::ShowShadows, V::Bool(v)) => p.show_shadows = v,
            (P::ClipWarning(p), F::ShadowsColor, V::Color(v)) => p.shadows_color = v,
            (P::ClipWarning(p), F::ShowHighlights, V::Bool(v)) => p.show_highlights = v,
            (P::ClipWarning(p), F::HighlightsColor, V::Color(v)) => p.highlights_color = v,
            (P::ClipWarning(p), F::ShowBogus, V::Bool(v)) => p.show_bogus = v,
            (P::ClipWarning(p), F::BogusColor, V::Color(v)) => p.bogus_color = v,
            (P::ClipWarning(p), F::IncludeAlpha, V::Bool(v)) => p.include_alpha = v,
            (P::ClipWarning(p), F::IncludeTransparent, V::Bool(v)) => p.include_transparent = v,
            (P::InkCoverage(p), F::InkLimit, V::Float(v)) => p.limit = v,
            (P::InkCoverage(p), F::WarningColor, V::Color(v)) => p.warning_color = v,
            (P::InkCoverage(p), F::Profile, V::Path(v)) => p.profile = v,
            (P::Icc(p), F::SrcProfile, V::Path(v)) => p.src_profile = v,
            (P::Icc(p), F::DestProfile, V::Path(v)) => p.dest_profile = v,
            (P::Icc(p), F::Intent, V::Intent(v)) => p.intent = v,
            (P::Icc(p), F::BlackPointCompensation, V::Bool(v)) => {
                p.black_point_compensation = v
            }
            (P::Proof(p), F::Profile, V::Path(v)) => p.profile = v,
            (P::Proof(p), F::SimulationIntent, V::Intent(v)) => p.simulation_intent = v,
            (P::Proof(p), F::DisplayIntent, V::Intent(v)) => p.display_intent = v,
            (P::Proof(p), F::GamutCheck, V::Bool(v)) => p.gamut_check = v,
            (P::Proof(p), F::AlarmColor, V::Color(v)) => p.alarm_color = v,
            (P::Proof(p), F::GamutThreshold, V::Float(v)) => p.gamut_threshold = v,
            _ => return false,
        }
        true
    }
}

/// Derived state, one variant per kernel; gamma and contrast share the
/// lookup-table shape. Never persisted, never read before `ensure_ready`.
pub(crate) enum DerivedState {
    Lut(kernels::LutState),
    Colorblind(colorblind::ColorblindState),
    Aces(aces::AcesState),
    ClipWarning(clip_warning::ClipWarningState),
    InkCoverage(ink_coverage::InkCoverageState),
    Icc(icc::IccState),
    Proof(proof::ProofState),
}

/// A configurable display filter instance
pub struct Filter {
    id: FilterId,
    kind: FilterKind,
    params: FilterParams,
    enabled: bool,
    dirty: bool,
    derived: Option<DerivedState>,
    listeners: ChangeListeners,
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Filter {
    /// Create a filter of the given kind with default parameters
    pub fn new(kind: FilterKind) -> Self {
        Self::with_params(kind.default_params())
    }

    /// Create a filter from an explicit parameter set
    pub fn with_params(mut params: FilterParams) -> Self {
        params.clamp();
        Self {
            id: FilterId::next(),
            kind: params.kind(),
            params,
            enabled: true,
            dirty: true,
            derived: None,
            listeners: ChangeListeners::default(),
        }
    }

    pub fn id(&self) -> FilterId {
        self.id
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn descriptor(&self) -> &'static FilterDescriptor {
        self.kind.descriptor()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle the filter. Derived state is kept; a disabled filter is
    /// skipped by `apply`, not torn down.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.listeners.emit(self.id, &self.params);
        }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Set a single parameter field
    ///
    /// Out-of-range numeric values are clamped, never rejected; a field that
    /// does not belong to this kernel is an error. Marks the instance dirty
    /// and notifies listeners synchronously; recomputation waits for the
    /// next `apply`.
    pub fn set_param(&mut self, field: ParamField, value: ParamValue) -> Result<()> {
        if !self.params.apply_field(field, value) {
            return Err(Error::Parameter {
                kind: self.kind,
                field,
            });
        }
        self.params.clamp();
        self.touch();
        Ok(())
    }

    /// Replace the whole parameter set (must match this filter's kind)
    pub fn set_params(&mut self, mut params: FilterParams) -> Result<()> {
        if params.kind() != self.kind {
            return Err(Error::KindMismatch {
                expected: self.kind,
                actual: params.kind(),
            });
        }
        params.clamp();
        if params != self.params {
            self.params = params;
            self.touch();
        }
        Ok(())
    }

    /// Batch-edit parameters through a closure: one dirty mark, one
    /// notification, one eventual recomputation for any number of writes
    ///
    /// The closure may not replace the parameter variant; an edit that does
    /// is reverted wholesale.
    pub fn update<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut FilterParams),
    {
        let previous = self.params.clone();
        edit(&mut self.params);
        if self.params.kind() != self.kind {
            tracing::warn!("parameter update replaced the kernel variant, reverting");
            self.params = previous;
            return;
        }
        self.params.clamp();
        self.touch();
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.listeners.emit(self.id, &self.params);
    }

    /// Subscribe to synchronous change notifications
    pub fn connect_changed<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(FilterId, &FilterParams) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn disconnect(&mut self, id: ListenerId) {
        self.listeners.unsubscribe(id);
    }

    /// Drop derived state (including any transform handles) immediately
    pub fn invalidate(&mut self) {
        self.derived = None;
        self.dirty = true;
    }

    /// Rebuild derived state if a parameter changed since the last build
    pub fn ensure_ready(&mut self) {
        if !self.dirty && self.derived.is_some() {
            return;
        }
        tracing::debug!(filter = self.descriptor().name, "rebuilding derived state");
        // Tear the old state down before building its replacement so
        // transform handles never coexist across a rebuild.
        self.derived = None;
        let derived = match &self.params {
            FilterParams::Gamma(p) => DerivedState::Lut(gamma::configure(p)),
            FilterParams::Contrast(p) => DerivedState::Lut(contrast::configure(p)),
            FilterParams::Colorblind(p) => DerivedState::Colorblind(colorblind::configure(p)),
            FilterParams::Aces(p) => DerivedState::Aces(aces::configure(p)),
            FilterParams::ClipWarning(p) => DerivedState::ClipWarning(clip_warning::configure(p)),
            FilterParams::InkCoverage(p) => {
                DerivedState::InkCoverage(ink_coverage::configure(p))
            }
            FilterParams::Icc(p) => DerivedState::Icc(icc::configure(p)),
            FilterParams::Proof(p) => DerivedState::Proof(proof::configure(p)),
        };
        self.derived = Some(derived);
        self.dirty = false;
    }

    /// Apply this filter in place over the region
    ///
    /// Disabled filters are an exact identity. Kernels that only understand
    /// RGBA pass CMYKA buffers through unchanged (and vice versa for the
    /// native-CMYKA ink path); per-pixel work is independent of processing
    /// order, so row-parallel execution yields identical output.
    pub fn apply(&mut self, region: &mut PixelRegion<'_>) -> Result<()> {
        if !self.enabled || region.region().is_empty() {
            return Ok(());
        }
        self.ensure_ready();
        let Some(derived) = self.derived.as_ref() else {
            return Ok(());
        };

        let channels = region.channels();
        let rgba = region.format() == PixelFormat::RgbaF32;
        let x0 = region.region().x;

        match derived {
            DerivedState::Lut(state) => {
                if rgba {
                    for_each_row(region, |_, row| kernels::remap_row(row, channels, state.lut()));
                }
            }
            DerivedState::Colorblind(state) => {
                if rgba {
                    for_each_row(region, |_, row| {
                        for pixel in rgba_pixels_mut(row) {
                            let out =
                                colorblind::simulate(state, [pixel[0], pixel[1], pixel[2]]);
                            pixel[..3].copy_from_slice(&out);
                        }
                    });
                }
            }
            DerivedState::Aces(state) => {
                if rgba {
                    for_each_row(region, |_, row| aces::tone_map_row(row, channels, state));
                }
            }
            DerivedState::ClipWarning(state) => {
                if rgba {
                    for_each_row(region, |y, row| {
                        for (i, pixel) in rgba_pixels_mut(row).iter_mut().enumerate() {
                            clip_warning::mark_pixel(state, pixel, x0 + i as u32, y);
                        }
                    });
                }
            }
            DerivedState::InkCoverage(state) => match region.format() {
                PixelFormat::CmykaF32 => {
                    for (_, row) in region.rows_mut() {
                        for pixel in row.chunks_exact_mut(channels) {
                            ink_coverage::mark_cmyka_pixel(state, pixel);
                        }
                    }
                }
                PixelFormat::RgbaF32 => {
                    for (_, row) in region.rows_mut() {
                        ink_coverage::mark_rgba_row(state, row);
                    }
                }
            },
            DerivedState::Icc(state) => {
                if let (true, Some(transform)) = (rgba, state.transform()) {
                    let mut scratch = Vec::new();
                    for (_, row) in region.rows_mut() {
                        transform.transform_in_place(row, &mut scratch)?;
                    }
                }
            }
            DerivedState::Proof(state) => {
                if let (true, Some(proof)) = (rgba, state.proof()) {
                    let mut rgb = Vec::new();
                    for (_, row) in region.rows_mut() {
                        rgb.clear();
                        for pixel in row.chunks_exact(channels) {
                            rgb.extend_from_slice(&pixel[..3]);
                        }
                        proof.apply_rgb_row(&mut rgb)?;
                        for (pixel, out) in
                            row.chunks_exact_mut(channels).zip(rgb.chunks_exact(3))
                        {
                            pixel[..3].copy_from_slice(out);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Persist the configuration: parameters plus the enabled flag, never
    /// derived state
    pub fn to_state(&self) -> Result<Value> {
        let mut value = serde_json::to_value(&self.params)?;
        if let Value::Object(map) = &mut value {
            map.insert("enabled".into(), Value::Bool(self.enabled));
        }
        Ok(value)
    }

    /// Restore a filter from persisted state
    ///
    /// Unknown keys are ignored; out-of-range fields reset to their kernel
    /// defaults; a missing `enabled` key means enabled.
    pub fn from_state(state: &Value) -> Result<Self> {
        let enabled = state
            .get("enabled")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let mut params: FilterParams = serde_json::from_value(state.clone())?;
        params.sanitize();
        let mut filter = Self::with_params(params);
        filter.enabled = enabled;
        Ok(filter)
    }
}
