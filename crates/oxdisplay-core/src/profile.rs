//! ICC color profile handles
//!
//! Thin wrapper around `moxcms::ColorProfile`. Profile parsing and built-in
//! profile construction are delegated entirely to the engine; this module
//! only decides how open failures surface. Per the error policy, a filter
//! whose profile cannot be opened degrades to identity instead of failing,
//! so the service entry points return `Option` rather than `Result`.

use std::path::Path;

use crate::{Error, Result};

/// Color space of a profile's device side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Cmyk,
    Gray,
    Lab,
    /// Anything this pipeline has no dedicated handling for
    Other,
}

impl ColorSpace {
    /// Number of device channels, as laid out in transform buffers
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb | Self::Lab => 3,
            Self::Cmyk => 4,
            Self::Other => 0,
        }
    }

    pub fn is_cmyk(&self) -> bool {
        matches!(self, Self::Cmyk)
    }
}

impl From<moxcms::DataColorSpace> for ColorSpace {
    fn from(cs: moxcms::DataColorSpace) -> Self {
        match cs {
            moxcms::DataColorSpace::Rgb => Self::Rgb,
            moxcms::DataColorSpace::Cmyk => Self::Cmyk,
            moxcms::DataColorSpace::Gray => Self::Gray,
            moxcms::DataColorSpace::Lab => Self::Lab,
            _ => Self::Other,
        }
    }
}

/// ICC color profile
///
/// Reference to a parsed profile. Cloning is cheap enough to treat handles
/// as shared read-only values; a profile is never mutated after open.
#[derive(Debug, Clone)]
pub struct ColorProfile {
    inner: moxcms::ColorProfile,
}

impl ColorProfile {
    /// Parse a profile from raw ICC bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let inner = moxcms::ColorProfile::new_from_slice(data)
            .map_err(|e| Error::ProfileParse(format!("{:?}", e)))?;
        Ok(Self { inner })
    }

    /// Read and parse a profile file
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Profile-service open: bytes in, handle or nothing out
    ///
    /// Open failure is recoverable (the dependent filter falls back to
    /// identity), so it is reported as `None`, not as an error.
    pub fn open_bytes(data: &[u8]) -> Option<Self> {
        match Self::from_bytes(data) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("profile bytes rejected: {e}");
                None
            }
        }
    }

    /// Profile-service open by path; see [`open_bytes`](Self::open_bytes)
    pub fn open_path(path: &Path) -> Option<Self> {
        match Self::from_file(path) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("profile {} not usable: {e}", path.display());
                None
            }
        }
    }

    /// Built-in sRGB profile
    pub fn new_srgb() -> Self {
        Self {
            inner: moxcms::ColorProfile::new_srgb(),
        }
    }

    /// Built-in Display P3 profile
    pub fn new_display_p3() -> Self {
        Self {
            inner: moxcms::ColorProfile::new_display_p3(),
        }
    }

    /// Built-in Adobe RGB (1998) profile
    pub fn new_adobe_rgb() -> Self {
        Self {
            inner: moxcms::ColorProfile::new_adobe_rgb(),
        }
    }

    /// Grayscale profile with the given gamma
    pub fn new_gray_with_gamma(gamma: f32) -> Self {
        Self {
            inner: moxcms::ColorProfile::new_gray_with_gamma(gamma),
        }
    }

    /// Device-side color space
    pub fn color_space(&self) -> ColorSpace {
        self.inner.color_space.into()
    }

    /// Check if this is a CMYK profile
    pub fn is_cmyk(&self) -> bool {
        self.color_space().is_cmyk()
    }

    /// Description text if the profile carries one
    pub fn description(&self) -> Option<String> {
        self.inner.description.as_ref().map(|text| match text {
            moxcms::ProfileText::PlainString(s) => s.clone(),
            moxcms::ProfileText::Localizable(locs) => {
                locs.first().map(|l| l.value.clone()).unwrap_or_default()
            }
            moxcms::ProfileText::Description(desc) => desc.ascii_string.clone(),
        })
    }

    /// Access the inner moxcms profile
    pub fn inner(&self) -> &moxcms::ColorProfile {
        &self.inner
    }
}

impl From<moxcms::ColorProfile> for ColorProfile {
    fn from(inner: moxcms::ColorProfile) -> Self {
        Self { inner }
    }
}
