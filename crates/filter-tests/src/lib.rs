//! # filter-tests
//!
//! Integration and property tests for the oxdisplay display filter
//! pipeline, plus shared buffer generators for tests and benches.
//!
//! ## Test Categories
//!
//! 1. **Chain behavior**: determinism, identity of disabled filters,
//!    order sensitivity, in-place application
//! 2. **Kernel properties**: lookup-table laws, the colorblind anchor fixed
//!    point, clip classification, ink coverage thresholds
//! 3. **Persistence**: parameter round-trips, unknown-key tolerance,
//!    out-of-range recovery, unknown filter tags

pub mod patterns;

pub use patterns::{cmyka_buffer, gradient_rgba, seeded_rgba};
