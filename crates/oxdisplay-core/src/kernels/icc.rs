//! Profile-driven display conversion
//!
//! Converts the buffer from its image space to a destination (monitor)
//! profile. Without a usable destination profile there is nothing sensible
//! to convert to, so the filter stays in copy-through mode; an unreadable
//! source profile likewise leaves the transform unbuilt rather than guessing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::profile::ColorProfile;
use crate::transform::{RenderingIntent, Transform, TransformOptions};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IccParams {
    /// Image space; sRGB when unset
    pub src_profile: Option<PathBuf>,
    /// Monitor profile; identity when unset
    pub dest_profile: Option<PathBuf>,
    pub intent: RenderingIntent,
    pub black_point_compensation: bool,
}

impl IccParams {
    pub(crate) fn clamp(&mut self) {}

    pub(crate) fn sanitize(&mut self) {}
}

pub(crate) struct IccState {
    transform: Option<Transform>,
}

impl IccState {
    pub(crate) fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }
}

pub(crate) fn configure(params: &IccParams) -> IccState {
    let Some(dest_path) = &params.dest_profile else {
        return IccState { transform: None };
    };
    let Some(dest) = ColorProfile::open_path(dest_path) else {
        tracing::warn!(
            "destination profile {} unusable, display conversion is identity",
            dest_path.display()
        );
        return IccState { transform: None };
    };

    let src = match &params.src_profile {
        Some(path) => match ColorProfile::open_path(path) {
            Some(profile) => profile,
            None => {
                tracing::warn!(
                    "source profile {} unusable, display conversion is identity",
                    path.display()
                );
                return IccState { transform: None };
            }
        },
        None => ColorProfile::new_srgb(),
    };

    let transform = Transform::display(
        &src,
        &dest,
        TransformOptions {
            intent: params.intent,
            black_point_compensation: params.black_point_compensation,
        },
    )
    .inspect_err(|e| tracing::warn!("display transform failed: {e}"))
    .ok();

    IccState { transform }
}
