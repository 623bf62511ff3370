//! # oxdisplay - Oxidized Display Filter Pipeline
//!
//! An ordered chain of pluggable, stateful pixel transforms applied to a
//! rendered image buffer before it reaches the screen.
//!
//! ## Goals
//!
//! - **Composable**: each filter is independently configurable, toggleable
//!   and reorderable; the chain applies them in place, in order
//! - **Predictable**: the same configuration over the same buffer produces
//!   byte-identical output, with no I/O in the per-pixel path
//! - **Unbreakable**: a misconfigured filter degrades to identity rather
//!   than preventing the rest of the pipeline from rendering
//!
//! Profile parsing and profile-to-profile conversion are delegated to
//! moxcms; the parametric kernels (gamma, contrast, color-deficient vision,
//! filmic tone mapping, clip warning, total ink coverage) are closed-form
//! per-pixel remaps with precomputed derived state.
//!
//! ## Quick Start
//!
//! ```
//! use oxdisplay_core::{
//!     Filter, FilterChain, FilterKind, ParamField, ParamValue,
//!     PixelFormat, PixelRegion, Region,
//! };
//!
//! let mut chain = FilterChain::new();
//! let gamma = chain.add(Filter::new(FilterKind::Gamma));
//! chain.add(Filter::new(FilterKind::ClipWarning));
//!
//! chain
//!     .get_mut(gamma)
//!     .unwrap()
//!     .set_param(ParamField::Gamma, ParamValue::Float(2.2))
//!     .unwrap();
//!
//! let mut pixels = vec![0.5f32; 4 * 16 * 16];
//! let mut region = PixelRegion::interleaved(
//!     &mut pixels,
//!     PixelFormat::RgbaF32,
//!     Region::new(0, 0, 16, 16),
//! )
//! .unwrap();
//! chain.apply(&mut region).unwrap();
//! ```

pub mod chain;
pub mod error;
pub mod filter;
pub mod kernels;
pub mod notify;
pub mod profile;
pub mod region;
pub mod transform;

pub use chain::FilterChain;
pub use error::{Error, Result};
pub use filter::{Filter, FilterDescriptor, FilterKind, FilterParams, ParamField, ParamValue};
pub use notify::{FilterId, ListenerId, ParamsBinding, RedrawFlag, bind_params};
pub use profile::{ColorProfile, ColorSpace};
pub use region::{PixelFormat, PixelRegion, Region};
pub use transform::{Layout, ProofTransform, RenderingIntent, Transform, TransformOptions};

/// Version of oxdisplay
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
